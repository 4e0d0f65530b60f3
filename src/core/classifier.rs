//! Media link classification.
//!
//! Maps a submitted link onto the kind of media it points at. Rules are
//! checked in order and the first match wins; the canonical YouTube rules
//! overlap on host so their path prefixes must stay in this order
//! (`/watch/` before `/watch`).

use std::collections::HashMap;

use reqwest::Url;
use thiserror::Error;

pub const YOUTUBE_SHORT_HOST: &str = "youtu.be";
pub const YOUTUBE_HOST: &str = "www.youtube.com";
pub const DRIVE_HOST: &str = "drive.google.com";

/// Errors raised for links that break their platform's URL conventions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Link {link} is missing query parameter '{param}'")]
    MissingParameter { link: String, param: &'static str },
}

/// What a media link points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLink {
    YouTube {
        video_id: String,
    },
    YouTubeClip {
        video_id: String,
        clip_id: String,
        clip_timestamp: String,
    },
    /// Anything else; `url` is what gets fetched (may be empty)
    Image {
        url: String,
    },
}

impl MediaLink {
    /// Thumbnail URL for YouTube media with a non-empty video id
    pub fn thumbnail_url(&self) -> Option<String> {
        match self {
            MediaLink::YouTube { video_id } | MediaLink::YouTubeClip { video_id, .. }
                if !video_id.is_empty() =>
            {
                Some(format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", video_id))
            }
            _ => None,
        }
    }
}

/// A link split into the parts the rules look at
#[derive(Debug)]
struct ParsedLink<'a> {
    raw: &'a str,
    host: String,
    path: String,
    params: HashMap<String, String>,
}

impl<'a> ParsedLink<'a> {
    fn parse(raw: &'a str) -> Self {
        match Url::parse(raw) {
            Ok(url) => Self {
                raw,
                host: url.host_str().unwrap_or_default().to_string(),
                path: url.path().to_string(),
                params: parse_query(url.query().unwrap_or_default()),
            },
            // Relative or empty links fall through to the image rule
            Err(_) => Self {
                raw,
                host: String::new(),
                path: String::new(),
                params: HashMap::new(),
            },
        }
    }

    fn is_host(&self, host: &str) -> bool {
        self.host == host
    }

    fn param(&self, name: &'static str) -> Result<String, ClassifyError> {
        self.params
            .get(name)
            .cloned()
            .ok_or_else(|| ClassifyError::MissingParameter {
                link: self.raw.to_string(),
                param: name,
            })
    }

    /// Path with every occurrence of `prefix` removed
    fn path_after(&self, prefix: &str) -> String {
        self.path.replace(prefix, "")
    }
}

type Predicate = fn(&ParsedLink) -> bool;
type Handler = fn(&ParsedLink) -> Result<MediaLink, ClassifyError>;

/// Classification rules, in precedence order
const RULES: &[(&str, Predicate, Handler)] = &[
    ("youtube_short", is_youtube_short, youtube_short),
    ("youtube_watch_path", is_youtube_watch_path, youtube_watch_path),
    ("youtube_live", is_youtube_live, youtube_live),
    ("youtube_clip", is_youtube_clip, youtube_clip),
    ("youtube_watch_query", is_youtube_watch_query, youtube_watch_query),
    ("drive_file", is_drive_file, drive_file),
];

fn is_youtube_short(l: &ParsedLink) -> bool {
    l.is_host(YOUTUBE_SHORT_HOST)
}

fn youtube_short(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    Ok(MediaLink::YouTube {
        video_id: l.path.trim_matches('/').to_string(),
    })
}

fn is_youtube_watch_path(l: &ParsedLink) -> bool {
    l.is_host(YOUTUBE_HOST) && l.path.starts_with("/watch/")
}

fn youtube_watch_path(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    Ok(MediaLink::YouTube {
        video_id: l.path_after("/watch/"),
    })
}

fn is_youtube_live(l: &ParsedLink) -> bool {
    l.is_host(YOUTUBE_HOST) && l.path.starts_with("/live/")
}

fn youtube_live(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    Ok(MediaLink::YouTube {
        video_id: l.path_after("/live/"),
    })
}

fn is_youtube_clip(l: &ParsedLink) -> bool {
    l.is_host(YOUTUBE_HOST) && l.path.starts_with("/embed")
}

/// Clip links carry no defaults: both `clip` and `clipt` are required
fn youtube_clip(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    Ok(MediaLink::YouTubeClip {
        video_id: l.path_after("/embed/"),
        clip_id: l.param("clip")?,
        clip_timestamp: l.param("clipt")?,
    })
}

fn is_youtube_watch_query(l: &ParsedLink) -> bool {
    l.is_host(YOUTUBE_HOST) && l.path.starts_with("/watch")
}

fn youtube_watch_query(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    Ok(MediaLink::YouTube {
        video_id: l.param("v")?,
    })
}

fn is_drive_file(l: &ParsedLink) -> bool {
    l.is_host(DRIVE_HOST) && l.path.starts_with("/file/d/")
}

fn drive_file(l: &ParsedLink) -> Result<MediaLink, ClassifyError> {
    let rest = l.path_after("/file/d/");
    let file_id = rest.split('/').next().unwrap_or_default();
    Ok(MediaLink::Image {
        url: drive_download_url(file_id),
    })
}

/// Direct-download URL for a Drive file id
pub fn drive_download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={}", file_id)
}

/// Classify a media link
pub fn classify(link: &str) -> Result<MediaLink, ClassifyError> {
    let parsed = ParsedLink::parse(link);

    for (name, matches, handle) in RULES {
        if matches(&parsed) {
            tracing::debug!(rule = name, link, "Classified media link");
            return handle(&parsed);
        }
    }

    Ok(MediaLink::Image {
        url: link.to_string(),
    })
}

/// Split a query string into parameters after unescaping HTML entities
///
/// Parameters without `=` are dropped; they only matter if looked up.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    unescape_html(query)
        .split('&')
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Named entities that decode even without a trailing `;`
const BARE_ENTITIES: &[(&str, char)] = &[("amp", '&'), ("lt", '<'), ("gt", '>'), ("quot", '"')];

/// Decode the HTML entities that show up in copied links
///
/// Numeric references and `amp`/`lt`/`gt`/`quot` decode with or without the
/// closing `;`; `apos` needs it. Anything else is kept as written.
pub fn unescape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        match decode_entity(tail) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the entity at the start of `tail` (text after `&`)
///
/// Returns the character and the number of bytes consumed, `;` included.
fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let with_semicolon = |len: usize| {
        if tail[len..].starts_with(';') {
            len + 1
        } else {
            len
        }
    };

    if let Some(num) = tail.strip_prefix('#') {
        let (digits, radix, skip) = match num.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (num, 10, 1),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        return char::from_u32(code).map(|c| (c, with_semicolon(skip + len)));
    }

    if tail.starts_with("apos;") {
        return Some(('\'', 5));
    }

    BARE_ENTITIES
        .iter()
        .find(|(name, _)| tail.starts_with(name))
        .map(|(name, c)| (*c, with_semicolon(name.len())))
}
