//! Batch driver.
//!
//! Reads the spreadsheet row by row, processes every included row in order
//! and writes the wall document once all rows are done.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::adapters::HttpImageFetcher;
use crate::config::BatchConfig;
use crate::domain::{SubmissionRow, WallDocument};

use super::processor::{BatchState, RowProcessor};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data rows read (header excluded)
    pub rows_read: usize,
    /// Rows skipped by the exclusion flag
    pub rows_skipped: usize,
    /// Messages in the output document
    pub messages_written: usize,
    /// Image fetches attempted
    pub images_attempted: usize,
}

/// Run a full batch: spreadsheet in, JSON document out
#[instrument(skip(config), fields(spreadsheet = %config.spreadsheet_path.display()))]
pub async fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    config.validate()?;

    let fetcher = HttpImageFetcher::new(&config.fetch)?;
    let processor = RowProcessor::new(Box::new(fetcher), &config.image_dir);

    let reader = csv_reader(&config.spreadsheet_path)?;
    let (document, summary) = build_document(&processor, reader).await?;

    write_document(&config.json_path, &document).await?;
    info!(
        messages = summary.messages_written,
        skipped = summary.rows_skipped,
        "Wrote {}",
        config.json_path.display()
    );

    Ok(summary)
}

/// Open the spreadsheet; the header row is skipped, row lengths may vary
pub fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))
}

/// Process every row and assemble the document
pub async fn build_document<R: Read>(
    processor: &RowProcessor,
    mut reader: csv::Reader<R>,
) -> Result<(WallDocument, BatchSummary)> {
    let mut state = BatchState::new();
    let mut summary = BatchSummary::default();
    let mut messages = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row_number = index + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row_number))?;
        summary.rows_read += 1;

        let row = SubmissionRow::from_record(&record)
            .with_context(|| format!("Malformed row {}", row_number))?;
        if row.is_excluded() {
            debug!(row = row_number, "Skipping excluded row");
            summary.rows_skipped += 1;
            continue;
        }

        let message = processor
            .process(&mut state, &row)
            .await
            .with_context(|| format!("Failed to process row {}", row_number))?;
        info!(row = row_number, id = %message.id, "Processed {}", message.sender_name);
        messages.push(message);
    }

    let charsets = state.charsets();
    info!("Total number of images: {}", state.image_count);
    info!("KR chars: {}", charsets.charset_sans_kr);
    info!("JP chars: {}", charsets.charset_sans_jp);

    summary.messages_written = messages.len();
    summary.images_attempted = state.image_count;

    let document = WallDocument::new(charsets.charset_sans_kr, charsets.charset_sans_jp, messages);
    Ok((document, summary))
}

/// Write the document, creating parent directories first
pub async fn write_document(path: &Path, document: &WallDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let bytes = document.to_json_bytes().context("Failed to serialize document")?;
    fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write output: {}", path.display()))?;

    Ok(())
}
