use vigil_config::VigilConfig;

/// Emit warnings for configurations that will silently produce empty checkpoints.
pub fn warn_unconfigured(config: &VigilConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &VigilConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.analytics.is_configured() && has_env_prefix(&env_keys, "VIGIL_ANALYTICS") {
        warnings.push(
            "Analytics config appears default while VIGIL_ANALYTICS* env vars exist. Use double underscores (example: VIGIL_ANALYTICS__API_KEY)."
                .to_string(),
        );
    }

    if !config.analytics.is_configured() && !config.database.has_tracked_tables() {
        warnings.push(
            "No metric source is configured; every checkpoint will be inconclusive. Set [analytics] or [database].tracked_tables."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
