use std::path::Path;

use anyhow::Context;
use vigil_config::VigilConfig;

/// Load `.env` from the project root (if present), then the layered config.
pub fn load_config(project_root: &Path) -> anyhow::Result<VigilConfig> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }

    VigilConfig::load_from(project_root).map_err(anyhow::Error::from)
}
