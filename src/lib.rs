//! wall_builder - Message wall document builder
//!
//! Turns the rows of a submission spreadsheet into a single JSON document
//! consumed by the wall renderer.
//!
//! # Pipeline
//!
//! - Each included row becomes a `MessageRecord` with a deterministic id
//! - Media links are classified (YouTube, YouTube clip, image, Drive image)
//! - Images are downloaded once into a content-addressed directory
//! - Every character seen is accumulated and split into glyph subsets
//!
//! # Modules
//!
//! - `adapters`: External integrations (HTTP image fetching)
//! - `core`: Classification, row processing, charset extraction, batch driver
//! - `domain`: Data structures (rows, messages, media)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! wall-builder submissions.csv public/images public/messages.json
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use config::{BatchConfig, FetchSettings};
pub use crate::core::{classify, extract_charsets, BatchState, BatchSummary, MediaLink, RowProcessor};
pub use domain::{
    DecalVariant, MediaRecord, MessageId, MessageRecord, SubmissionRow, Thumbnail, WallDocument,
};
