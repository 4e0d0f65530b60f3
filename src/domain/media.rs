//! Media attached to a message.

use serde::Serialize;

/// YouTube's `mqdefault` thumbnails are always 320x180 (16:9)
pub const YOUTUBE_THUMB_WIDTH: u32 = 320;
pub const YOUTUBE_THUMB_HEIGHT: u32 = 180;

/// Resolved media for a message, tagged by `type` in JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MediaRecord {
    /// Regular YouTube video
    YouTube {
        /// Thumbnail URL (constructed, never fetched)
        path: String,
        video_id: String,
        width: u32,
        height: u32,
    },

    /// Clip cut from a YouTube video
    YouTubeClip {
        path: String,
        video_id: String,
        clip_id: String,
        #[serde(rename = "clipt")]
        clip_timestamp: String,
        width: u32,
        height: u32,
    },

    /// Downloaded image
    Image {
        /// Local path of the downloaded file
        path: String,
        width: u32,
        height: u32,
        /// Precomputed thumbnail, null when none was found
        thumbnail: Option<Thumbnail>,
    },
}

impl MediaRecord {
    /// Create a YouTube record with the standard thumbnail size
    pub fn youtube(video_id: impl Into<String>, path: impl Into<String>) -> Self {
        MediaRecord::YouTube {
            path: path.into(),
            video_id: video_id.into(),
            width: YOUTUBE_THUMB_WIDTH,
            height: YOUTUBE_THUMB_HEIGHT,
        }
    }

    /// Create a YouTube clip record with the standard thumbnail size
    pub fn youtube_clip(
        video_id: impl Into<String>,
        clip_id: impl Into<String>,
        clip_timestamp: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        MediaRecord::YouTubeClip {
            path: path.into(),
            video_id: video_id.into(),
            clip_id: clip_id.into(),
            clip_timestamp: clip_timestamp.into(),
            width: YOUTUBE_THUMB_WIDTH,
            height: YOUTUBE_THUMB_HEIGHT,
        }
    }
}

/// Precomputed image thumbnail placed next to the full image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub path: String,
    pub width: u32,
    pub height: u32,
}
