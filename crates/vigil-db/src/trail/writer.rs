//! JSONL trail writer.
//!
//! Appends `CommandRecord`s to per-day `.vigil/trail/{yyyy-mm-dd}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use vigil_core::commands::CommandRecord;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;

/// Appends executed engine commands to per-day JSONL files.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer (for testing or when trail is not needed).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Whether trail writing is currently enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append records to the file for the day of each record's timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a timestamp is malformed or the file write fails.
    pub fn append(&self, records: &[CommandRecord]) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        for record in records {
            let day = parse_datetime(&record.ts)?.format("%Y-%m-%d");
            let path = self.trail_dir.join(format!("{day}.jsonl"));
            serde_jsonlines::append_json_lines(&path, [record])
                .map_err(|e| DatabaseError::Other(e.into()))?;
        }
        Ok(())
    }

    /// Read back every record of one day's file, in append order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file cannot be read or a line is malformed.
    pub fn read_day(&self, day: &str) -> Result<Vec<CommandRecord>, DatabaseError> {
        let path = self.trail_dir.join(format!("{day}.jsonl"));
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Other(e.into()))
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }
}
