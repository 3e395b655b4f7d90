use std::path::PathBuf;

use anyhow::Context;
use vigil_config::VigilConfig;
use vigil_db::service::VigilService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: VigilService,
    pub config: VigilConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the project's database and trail, creating their directories.
    pub async fn init(project_root: PathBuf, config: VigilConfig) -> anyhow::Result<Self> {
        let db_path = config.database.resolved_path(&project_root);
        let trail_dir = config.database.resolved_trail_dir(&project_root);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = VigilService::new_local(&db_path.to_string_lossy(), Some(trail_dir))
            .await
            .context("failed to initialize vigil-db service")?;

        tracing::debug!(root = %project_root.display(), db = %db_path.display(), "context ready");

        Ok(Self {
            service,
            config,
            project_root,
        })
    }
}
