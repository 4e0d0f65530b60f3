//! Message records and their identity.

use serde::Serialize;

use super::media::MediaRecord;

/// Sender whose messages always get the headpat decal
pub const HEADPAT_SENDER: &str = "Mikururun";

/// Number of hash-selected decals
pub const DECAL_COUNT: u128 = 5;

/// Message identifier (MD5("{name}+{title}") as lowercase hex)
///
/// Identical (name, title) pairs share an id; the same id also names the
/// downloaded image on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Derive the id from a sender name and title
    pub fn from_sender(name: &str, title: &str) -> Self {
        let digest = md5::compute(format!("{}+{}", name, title).as_bytes());
        Self(hex::encode(digest.0))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full digest as an integer
    pub fn numeric_value(&self) -> u128 {
        // Always 32 hex chars when built through from_sender
        u128::from_str_radix(&self.0, 16).unwrap_or_default()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decal overlay selected for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecalVariant(pub u8);

impl DecalVariant {
    /// Headpat decal, outside the hash-selected range
    pub const HEADPAT: DecalVariant = DecalVariant(10);

    /// Pick the decal for a sender
    pub fn for_message(sender_name: &str, id: &MessageId) -> Self {
        if sender_name == HEADPAT_SENDER {
            return Self::HEADPAT;
        }
        // < DECAL_COUNT, fits in u8
        DecalVariant((id.numeric_value() % DECAL_COUNT) as u8)
    }
}

/// One message on the wall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub decal_variant: DecalVariant,
    pub sender_name: String,
    pub sender_title: String,
    pub message: String,
    /// Always present in JSON, null when no media resolved
    pub media: Option<MediaRecord>,
}

/// The full output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WallDocument {
    pub charset_sans_kr: String,
    pub charset_sans_jp: String,
    pub messages: Vec<MessageRecord>,
}

impl WallDocument {
    /// Assemble the document, ordering messages by id
    pub fn new(charset_sans_kr: String, charset_sans_jp: String, mut messages: Vec<MessageRecord>) -> Self {
        messages.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            charset_sans_kr,
            charset_sans_jp,
            messages,
        }
    }

    /// Render as pretty JSON with 4-space indentation and literal non-ASCII
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}
