//! Core processing logic.
//!
//! This module contains:
//! - Classifier: Media link classification
//! - Charset: Glyph subset extraction
//! - Processor: Row to message conversion and the batch accumulator
//! - Batch: Spreadsheet driver and document writer

pub mod batch;
pub mod charset;
pub mod classifier;
pub mod processor;

// Re-export commonly used types
pub use batch::{build_document, csv_reader, run_batch, write_document, BatchSummary};
pub use charset::{extract_charsets, CharsetPair};
pub use classifier::{classify, ClassifyError, MediaLink};
pub use processor::{BatchState, RowProcessor};
