//! Field value model
//!
//! One answered form field, tagged by kind. Every concrete value carries the
//! authorship pair (`timestamp_ms`, `scout`) used for merge resolution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single answered field in a scouting entry.
///
/// The wire format uses an internally tagged representation
/// (`{"type": "counter", "count": 3, ...}`) shared with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryValue {
    /// A yes/no question
    Bool(BoolEntry),
    /// One of a selection of options
    Enum(EnumEntry),
    /// An amount of things
    Counter(CounterEntry),
    /// A free-text field, single or multi line
    TextEntry(TextEntry),
    /// An amount of real-world time
    Timer(TimerEntry),
    /// A list of image attachments
    Image(ImageEntry),
}

impl EntryValue {
    /// Authorship timestamp of this value (Unix ms).
    pub const fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Bool(entry) => entry.timestamp_ms,
            Self::Enum(entry) => entry.timestamp_ms,
            Self::Counter(entry) => entry.timestamp_ms,
            Self::TextEntry(entry) => entry.timestamp_ms,
            Self::Timer(entry) => entry.timestamp_ms,
            Self::Image(entry) => entry.timestamp_ms,
        }
    }

    /// Name of the scout who entered this value.
    pub fn scout(&self) -> &str {
        match self {
            Self::Bool(entry) => &entry.scout,
            Self::Enum(entry) => &entry.scout,
            Self::Counter(entry) => &entry.scout,
            Self::TextEntry(entry) => &entry.scout,
            Self::Timer(entry) => &entry.scout,
            Self::Image(entry) => &entry.scout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolEntry {
    /// The value
    pub value: bool,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    /// Index into the field definition's option list
    pub value: u32,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterEntry {
    /// The count; range limits live in the field definition
    pub count: i64,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    /// The text
    pub text: String,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerEntry {
    /// The value, in seconds
    pub time_seconds: f32,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// References to attached images; binary payloads live in the blob store
    pub images: Vec<ImageRef>,
    /// Authorship timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Scout who entered the value
    pub scout: String,
}

/// Reference to one image attachment.
///
/// `local` is the synchronization state: `true` means the payload exists only
/// in the local blob store and has not been confirmed by the server. Records
/// that came down from the server carry no flag, which deserializes as
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Generated image identifier
    pub image_id: Uuid,
    /// Content MIME type, e.g. `image/png`
    pub image_mime: String,
    /// Whether the payload is still local-only
    #[serde(default)]
    pub local: bool,
}

/// Wire body element for uploading one image to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    /// Generated image identifier
    pub image_id: Uuid,
    /// Content MIME type
    pub image_mime: String,
    /// Raw image bytes
    pub image_data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_value_wire_tags() {
        let value = EntryValue::Counter(CounterEntry {
            count: 3,
            timestamp_ms: 100,
            scout: "Ada".to_string(),
        });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "counter");
        assert_eq!(json["count"], 3);

        let value = EntryValue::TextEntry(TextEntry {
            text: "fast cycles".to_string(),
            timestamp_ms: 100,
            scout: "Ada".to_string(),
        });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "text_entry");
    }

    #[test]
    fn test_value_roundtrip_preserves_authorship() {
        let value = EntryValue::Timer(TimerEntry {
            time_seconds: 12.5,
            timestamp_ms: 42,
            scout: "Grace".to_string(),
        });
        let json = serde_json::to_string(&value).unwrap();
        let parsed: EntryValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
        assert_eq!(parsed.timestamp_ms(), 42);
        assert_eq!(parsed.scout(), "Grace");
    }

    #[test]
    fn test_image_ref_local_defaults_to_false() {
        let json = r#"{"image_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","image_mime":"image/png"}"#;
        let image: ImageRef = serde_json::from_str(json).unwrap();
        assert!(!image.local);
    }

    #[test]
    fn test_image_ref_roundtrip_keeps_local_flag() {
        let image = ImageRef {
            image_id: Uuid::new_v4(),
            image_mime: "image/jpeg".to_string(),
            local: true,
        };
        let json = serde_json::to_string(&image).unwrap();
        let parsed: ImageRef = serde_json::from_str(&json).unwrap();
        assert!(parsed.local);
        assert_eq!(parsed, image);
    }
}
