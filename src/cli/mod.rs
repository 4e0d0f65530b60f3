//! Command-line interface for wall-builder.
//!
//! Takes exactly three positional arguments and runs one batch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::BatchConfig;
use crate::core::run_batch;

/// wall-builder - Build the message wall document from a submission spreadsheet
#[derive(Parser, Debug)]
#[command(name = "wall-builder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Submission spreadsheet exported as CSV (UTF-8, header row first)
    pub spreadsheet_path: PathBuf,

    /// Directory downloaded images are written to
    pub image_path: PathBuf,

    /// Output JSON document
    pub json_path: PathBuf,
}

impl Cli {
    /// Resolve the batch configuration
    pub fn config(&self) -> BatchConfig {
        BatchConfig::new(&self.spreadsheet_path, &self.image_path, &self.json_path)
    }

    /// Execute the batch
    pub async fn execute(self) -> Result<()> {
        let config = self.config();
        let summary = run_batch(&config).await?;

        println!();
        println!("Rows read:       {}", summary.rows_read);
        println!("Rows skipped:    {}", summary.rows_skipped);
        println!("Messages:        {}", summary.messages_written);
        println!("Images:          {}", summary.images_attempted);
        println!("Output:          {}", config.json_path.display());

        Ok(())
    }
}
