//! Domain types for the wall builder.
//!
//! This module contains the core data structures:
//! - SubmissionRow: One spreadsheet row, read-only input
//! - MessageRecord: One rendered message with its identity and decal
//! - MediaRecord: Media attached to a message

pub mod media;
pub mod message;
pub mod row;

// Re-export commonly used types
pub use media::{MediaRecord, Thumbnail, YOUTUBE_THUMB_HEIGHT, YOUTUBE_THUMB_WIDTH};
pub use message::{DecalVariant, MessageId, MessageRecord, WallDocument};
pub use row::{RowError, SubmissionRow};
