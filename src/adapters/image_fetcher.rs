//! HTTP image fetcher.
//!
//! Downloads a media image once into the image directory, named after the
//! message id, and reports its pixel size. A thumbnail is never generated
//! here; one placed next to the image as `{id}_thumb.png` is picked up.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::ImageReader;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{FetchedImage, ImageFetcher};
use crate::config::FetchSettings;
use crate::domain::{MessageId, Thumbnail};

/// Image fetcher backed by reqwest
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher from settings
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Stream the response body into `target`
    ///
    /// Returns `Ok(false)` if the transfer broke off; the partial file is
    /// removed so the next run downloads again.
    async fn download(&self, mut response: reqwest::Response, target: &Path) -> Result<bool> {
        let part = part_path(target);
        let mut file = File::create(&part)
            .await
            .with_context(|| format!("Failed to create {}", part.display()))?;

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => file
                    .write_all(&chunk)
                    .await
                    .with_context(|| format!("Failed to write {}", part.display()))?,
                Ok(None) => break,
                Err(e) => {
                    drop(file);
                    warn!("Download of {} interrupted: {}", target.display(), e);
                    fs::remove_file(&part)
                        .await
                        .with_context(|| format!("Failed to remove {}", part.display()))?;
                    return Ok(false);
                }
            }
        }

        file.flush().await?;
        drop(file);
        fs::rename(&part, target)
            .await
            .with_context(|| format!("Failed to move image into {}", target.display()))?;

        Ok(true)
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, image_dir: &Path, id: &MessageId) -> Result<Option<FetchedImage>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error getting image from {}: {}", url, e);
                return Ok(None);
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if status != StatusCode::OK || !content_type.starts_with("image/") {
            warn!(
                %status,
                content_type = %content_type,
                "Error getting image from {}",
                url
            );
            return Ok(None);
        }

        let file_name = format!("{}{}", id, extension_for(&content_type));
        let target = image_dir.join(&file_name);

        let downloaded = if target.exists() {
            debug!("Image already downloaded: {}", target.display());
            false
        } else {
            fs::create_dir_all(image_dir)
                .await
                .with_context(|| format!("Failed to create image directory: {}", image_dir.display()))?;

            if !self.download(response, &target).await? {
                return Ok(None);
            }
            true
        };

        let (width, height) = match read_dimensions(&target) {
            Ok(size) => size,
            Err(e) => {
                warn!("Could not decode {}: {:#}", target.display(), e);
                // Bytes from this call only; a later run downloads again
                if downloaded {
                    fs::remove_file(&target)
                        .await
                        .with_context(|| format!("Failed to remove {}", target.display()))?;
                }
                return Ok(None);
            }
        };

        Ok(Some(FetchedImage {
            path: render_path(image_dir, &file_name),
            width,
            height,
            thumbnail: find_thumbnail(image_dir, id),
        }))
    }
}

/// File extension (with leading dot) for an image content type
///
/// Parameters after `;` are ignored. Unknown types get no extension.
pub fn extension_for(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let known = match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/svg+xml" => Some("svg"),
        "image/tiff" => Some("tiff"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        "image/avif" => Some("avif"),
        _ => None,
    };

    known
        .or_else(|| mime_guess::get_mime_extensions_str(&essence).and_then(|exts| exts.first().copied()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Pixel size of an image file, format sniffed from its content
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", path.display()))?
        .into_dimensions()
        .with_context(|| format!("Failed to decode {}", path.display()))
}

/// Report a precomputed `{id}_thumb.png` if one exists
fn find_thumbnail(image_dir: &Path, id: &MessageId) -> Option<Thumbnail> {
    let file_name = format!("{}_thumb.png", id);
    let path = image_dir.join(&file_name);
    if !path.exists() {
        return None;
    }

    match read_dimensions(&path) {
        Ok((width, height)) => Some(Thumbnail {
            path: render_path(image_dir, &file_name),
            width,
            height,
        }),
        Err(e) => {
            warn!("Ignoring unreadable thumbnail {}: {:#}", path.display(), e);
            None
        }
    }
}

/// Path as written into the document, always `/`-separated
pub fn render_path(image_dir: &Path, file_name: &str) -> String {
    let dir = image_dir.to_string_lossy();
    let dir = dir.trim_end_matches(['/', '\\']);
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", dir, file_name)
    }
}

fn part_path(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
