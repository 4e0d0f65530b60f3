//! Row processing.
//!
//! Turns one submission row into one message record. All state that grows
//! across rows lives in `BatchState`, owned by the caller.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::ImageFetcher;
use crate::domain::{DecalVariant, MediaRecord, MessageId, MessageRecord, SubmissionRow};

use super::charset::{extract_charsets, CharsetPair};
use super::classifier::{classify, MediaLink};

/// Accumulated state for a batch run
#[derive(Debug, Default)]
pub struct BatchState {
    /// Every character seen in any included row
    pub unique_chars: BTreeSet<char>,
    /// Image fetches attempted
    pub image_count: usize,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the text of a row to the seen characters
    pub fn record_text(&mut self, row: &SubmissionRow) {
        for text in row.text_fields() {
            self.unique_chars.extend(text.chars());
        }
    }

    /// Glyph subsets for everything seen so far
    pub fn charsets(&self) -> CharsetPair {
        extract_charsets(&self.unique_chars)
    }
}

/// Builds message records from rows
pub struct RowProcessor {
    fetcher: Box<dyn ImageFetcher>,
    image_dir: PathBuf,
}

impl RowProcessor {
    /// Create a processor that stores images under `image_dir`
    pub fn new(fetcher: Box<dyn ImageFetcher>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            image_dir: image_dir.into(),
        }
    }

    /// Process one included row
    pub async fn process(&self, state: &mut BatchState, row: &SubmissionRow) -> Result<MessageRecord> {
        state.record_text(row);

        let id = MessageId::from_sender(&row.sender_name, &row.sender_title);
        let decal_variant = DecalVariant::for_message(&row.sender_name, &id);
        let media = self.resolve_media(state, &id, &row.media_link).await?;

        Ok(MessageRecord {
            id,
            decal_variant,
            sender_name: row.sender_name.clone(),
            sender_title: row.sender_title.clone(),
            message: row.message.clone(),
            media,
        })
    }

    /// Classify a link and resolve it to a media record
    ///
    /// `None` when there is no link, no video id, or the image could not be
    /// fetched.
    async fn resolve_media(
        &self,
        state: &mut BatchState,
        id: &MessageId,
        link: &str,
    ) -> Result<Option<MediaRecord>> {
        let media = classify(link).with_context(|| format!("Failed to classify media for {}", id))?;
        let thumbnail_url = media.thumbnail_url();

        let record = match media {
            MediaLink::YouTube { video_id } => {
                thumbnail_url.map(|path| MediaRecord::youtube(video_id, path))
            }
            MediaLink::YouTubeClip {
                video_id,
                clip_id,
                clip_timestamp,
            } => thumbnail_url
                .map(|path| MediaRecord::youtube_clip(video_id, clip_id, clip_timestamp, path)),
            MediaLink::Image { url } if url.is_empty() => None,
            MediaLink::Image { url } => {
                state.image_count += 1;
                debug!(%id, url = %url, "Fetching image");
                self.fetcher
                    .fetch(&url, &self.image_dir, id)
                    .await?
                    .map(MediaRecord::from)
            }
        };

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::adapters::FetchedImage;
    use crate::domain::row::MIN_FIELDS;

    /// Records requested URLs and answers with a fixed result
    struct StubFetcher {
        result: Option<FetchedImage>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        fn new(result: Option<FetchedImage>) -> Self {
            Self {
                result,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, url: &str, image_dir: &Path, id: &MessageId) -> Result<Option<FetchedImage>> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.result.clone().map(|mut image| {
                image.path = format!("{}/{}.png", image_dir.display(), id);
                image
            }))
        }
    }

    fn row(name: &str, title: &str, message: &str, link: &str) -> SubmissionRow {
        let mut fields = vec![String::new(); MIN_FIELDS];
        fields[2] = name.to_string();
        fields[3] = title.to_string();
        fields[4] = message.to_string();
        fields[9] = link.to_string();
        SubmissionRow::from_fields(&fields).unwrap()
    }

    fn image(width: u32, height: u32) -> FetchedImage {
        FetchedImage {
            path: String::new(),
            width,
            height,
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_youtube_row() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(None)), "images");
        let mut state = BatchState::new();

        let msg = processor
            .process(&mut state, &row("Alice", "Knight", "Hi", "https://youtu.be/abc123"))
            .await
            .unwrap();

        assert_eq!(msg.id, MessageId::from_sender("Alice", "Knight"));
        assert_eq!(
            msg.media,
            Some(MediaRecord::youtube(
                "abc123",
                "https://i.ytimg.com/vi/abc123/mqdefault.jpg"
            ))
        );
        assert_eq!(state.image_count, 0);
    }

    #[tokio::test]
    async fn test_empty_link_has_null_media() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(Some(image(1, 1)))), "images");
        let mut state = BatchState::new();

        let msg = processor
            .process(&mut state, &row("Alice", "Knight", "Hi", ""))
            .await
            .unwrap();

        assert_eq!(msg.media, None);
        assert_eq!(state.image_count, 0);
    }

    #[tokio::test]
    async fn test_drive_link_fetches_rewritten_url() {
        let fetcher = StubFetcher::new(Some(image(640, 480)));
        let requests = Arc::clone(&fetcher.requests);
        let processor = RowProcessor::new(Box::new(fetcher), "images");
        let mut state = BatchState::new();

        let msg = processor
            .process(
                &mut state,
                &row("Bob", "", "", "https://drive.google.com/file/d/FILEID/view?usp=sharing"),
            )
            .await
            .unwrap();

        let id = MessageId::from_sender("Bob", "");
        assert_eq!(
            msg.media,
            Some(MediaRecord::Image {
                path: format!("images/{}.png", id),
                width: 640,
                height: 480,
                thumbnail: None,
            })
        );
        assert_eq!(
            *requests.lock().unwrap(),
            vec!["https://drive.google.com/uc?export=download&id=FILEID".to_string()]
        );
        assert_eq!(state.image_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_counts_and_nulls_media() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(None)), "images");
        let mut state = BatchState::new();

        let msg = processor
            .process(&mut state, &row("Carol", "", "", "https://example.com/missing.png"))
            .await
            .unwrap();

        assert_eq!(msg.media, None);
        assert_eq!(state.image_count, 1);
    }

    #[tokio::test]
    async fn test_missing_clip_parameter_is_fatal() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(None)), "images");
        let mut state = BatchState::new();

        let result = processor
            .process(
                &mut state,
                &row("Dan", "", "", "https://www.youtube.com/embed/xyz?clip=CLIPID"),
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_text_accumulates_across_rows() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(None)), "images");
        let mut state = BatchState::new();

        processor
            .process(&mut state, &row("한", "A", "中", ""))
            .await
            .unwrap();
        processor
            .process(&mut state, &row("글", "B", "文", ""))
            .await
            .unwrap();

        let charsets = state.charsets();
        assert_eq!(charsets.charset_sans_kr, "글한");
        assert_eq!(charsets.charset_sans_jp, "中文");
        assert!(state.unique_chars.contains(&'A'));
    }

    #[tokio::test]
    async fn test_headpat_sender_decal() {
        let processor = RowProcessor::new(Box::new(StubFetcher::new(None)), "images");
        let mut state = BatchState::new();

        let msg = processor
            .process(&mut state, &row("Mikururun", "Anything", "", ""))
            .await
            .unwrap();

        assert_eq!(msg.decal_variant, DecalVariant(10));
    }
}
