//! Configuration for a batch run.
//!
//! Everything comes from the three positional arguments; there is no config
//! file and no environment lookup beyond `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{bail, Result};

/// HTTP settings for image downloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("wall-builder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Resolved configuration for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Submission spreadsheet (CSV, UTF-8)
    pub spreadsheet_path: PathBuf,
    /// Directory downloaded images are written to
    pub image_dir: PathBuf,
    /// Output JSON document
    pub json_path: PathBuf,
    /// HTTP settings
    pub fetch: FetchSettings,
}

impl BatchConfig {
    /// Create a config with default fetch settings
    pub fn new(
        spreadsheet_path: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
        json_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spreadsheet_path: spreadsheet_path.into(),
            image_dir: image_dir.into(),
            json_path: json_path.into(),
            fetch: FetchSettings::default(),
        }
    }

    /// Check the inputs before any work starts
    pub fn validate(&self) -> Result<()> {
        if !self.spreadsheet_path.exists() {
            bail!(
                "Spreadsheet not found: {}",
                self.spreadsheet_path.display()
            );
        }
        if !self.spreadsheet_path.is_file() {
            bail!(
                "Spreadsheet is not a file: {}",
                self.spreadsheet_path.display()
            );
        }
        Ok(())
    }
}
