//! Adapter interfaces for external systems.
//!
//! The only external system is the web: images linked from submissions are
//! downloaded into the image directory.

pub mod image_fetcher;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{MediaRecord, MessageId, Thumbnail};

// Re-export the HTTP fetcher
pub use image_fetcher::HttpImageFetcher;

/// An image on disk with its size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// `{image_dir}/{id}{ext}`
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub thumbnail: Option<Thumbnail>,
}

impl From<FetchedImage> for MediaRecord {
    fn from(image: FetchedImage) -> Self {
        MediaRecord::Image {
            path: image.path,
            width: image.width,
            height: image.height,
            thumbnail: image.thumbnail,
        }
    }
}

/// Trait for image fetchers
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Make sure the image behind `url` is stored as `{image_dir}/{id}{ext}`
    ///
    /// Bad responses and undecodable content are logged and reported as
    /// `Ok(None)`. Filesystem errors are returned.
    async fn fetch(&self, url: &str, image_dir: &Path, id: &MessageId) -> Result<Option<FetchedImage>>;
}
