//! Local database and trail locations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_path() -> String {
    String::from(".vigil/vigil.db")
}

fn default_trail_dir() -> String {
    String::from(".vigil/trail")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// libSQL database file, relative to the project root unless absolute.
    #[serde(default = "default_path")]
    pub path: String,

    /// Directory for the JSONL command trail.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    /// Business tables whose row-count snapshots act as a metric source.
    #[serde(default)]
    pub tracked_tables: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            trail_dir: default_trail_dir(),
            tracked_tables: Vec::new(),
        }
    }
}

impl DatabaseConfig {
    /// Database path resolved against `root`.
    #[must_use]
    pub fn resolved_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.path)
    }

    /// Trail directory resolved against `root`.
    #[must_use]
    pub fn resolved_trail_dir(&self, root: &Path) -> PathBuf {
        resolve(root, &self.trail_dir)
    }

    /// Whether the row-count metric source has anything to compare.
    #[must_use]
    pub fn has_tracked_tables(&self) -> bool {
        !self.tracked_tables.is_empty()
    }
}

fn resolve(root: &Path, configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_root() {
        let config = DatabaseConfig::default();
        assert_eq!(
            config.resolved_path(Path::new("/srv/site")),
            PathBuf::from("/srv/site/.vigil/vigil.db")
        );
        assert_eq!(
            config.resolved_trail_dir(Path::new("/srv/site")),
            PathBuf::from("/srv/site/.vigil/trail")
        );
    }

    #[test]
    fn absolute_path_is_kept() {
        let config = DatabaseConfig {
            path: "/var/lib/vigil.db".into(),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_path(Path::new("/srv/site")),
            PathBuf::from("/var/lib/vigil.db")
        );
        assert!(!config.has_tracked_tables());
    }
}
