//! Typed `data` bodies for each event.
//!
//! Field names are camelCase on the wire. Document text and cursor positions
//! are opaque: the relay never inspects them, it only moves them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// A connection's display name, or the `Unknown` sentinel.
///
/// `Unknown` covers both a JOIN that carried no name and a registry miss.
/// It serializes as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayName {
    Known(String),
    #[default]
    Unknown,
}

impl DisplayName {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            DisplayName::Known(s) => Some(s),
            DisplayName::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DisplayName::Unknown)
    }
}

impl From<Option<String>> for DisplayName {
    fn from(v: Option<String>) -> Self {
        v.map_or(DisplayName::Unknown, DisplayName::Known)
    }
}

impl From<&str> for DisplayName {
    fn from(v: &str) -> Self {
        DisplayName::Known(v.to_owned())
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_deref().unwrap_or("<unknown>"))
    }
}

impl Serialize for DisplayName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DisplayName::Known(s) => serializer.serialize_str(s),
            DisplayName::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(DisplayName::from)
    }
}

/// One member of a room as exposed to clients. Computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub connection_id: String,
    pub display_name: DisplayName,
}

// --------------------
// client -> relay
// --------------------

/// `room.join` body. The room id travels in the envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinReq {
    #[serde(default)]
    pub display_name: DisplayName,
}

/// `code.change` body: the full document text.
#[derive(Debug, Deserialize)]
pub struct CodeChangeReq {
    pub text: String,
}

/// `code.sync` body: full text pushed to exactly one connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCodeReq {
    pub target_connection_id: String,
    pub text: String,
}

/// `cursor.move` body. The position shape belongs to the editor.
#[derive(Debug, Deserialize)]
pub struct CursorMoveReq {
    pub cursor: Box<RawValue>,
}

/// `chat.send` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendReq {
    pub message: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// --------------------
// relay -> client
// --------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    pub connection_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

/// `room.joined`: the roster after the join, plus who just joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Joined {
    pub roster: Vec<RosterEntry>,
    pub display_name: DisplayName,
    pub connection_id: String,
}

/// `code.change` as delivered: a full replacement, never a diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeText {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMoved {
    pub sender_connection_id: String,
    pub cursor: Box<RawValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message: String,
    pub display_name: DisplayName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disconnected {
    pub connection_id: String,
    pub display_name: DisplayName,
}
