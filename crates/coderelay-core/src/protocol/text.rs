//! JSON envelope (inbound) and frame (outbound).
//!
//! The inbound envelope stores `data` as `RawValue` so each service parses
//! only the body it owns. Outbound frames are serialized once and the
//! resulting string is shared across every recipient of a fan-out.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{RelayError, Result};
use crate::protocol::event::EventKind;

/// The only protocol version spoken by this relay.
pub const PROTOCOL_VERSION: u8 = 1;

/// Inbound envelope (client -> relay text frame).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Protocol version.
    pub v: u8,
    /// Service name (e.g., "code").
    pub svc: String,
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Optional client correlation number, echoed in error frames.
    #[serde(default)]
    pub seq: Option<u64>,
    /// Optional room id.
    #[serde(default)]
    pub room: Option<String>,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Parse and version-check a text frame.
    pub fn parse(s: &str) -> Result<Self> {
        let env: Envelope = serde_json::from_str(s)
            .map_err(|e| RelayError::BadRequest(format!("invalid envelope json: {e}")))?;
        if env.v != PROTOCOL_VERSION {
            return Err(RelayError::UnsupportedVersion);
        }
        Ok(env)
    }

    /// Resolve the event kind, rejecting svc/type pairs the relay does not accept.
    pub fn kind(&self) -> Result<EventKind> {
        EventKind::inbound(&self.svc, &self.msg_type).ok_or_else(|| RelayError::UnknownEvent {
            svc: self.svc.clone(),
            msg_type: self.msg_type.clone(),
        })
    }

    /// Room id, or a `BadRequest` naming the event that needed it.
    pub fn require_room(&self) -> Result<&str> {
        self.room
            .as_deref()
            .ok_or_else(|| RelayError::BadRequest(format!("{}.{} requires room", self.svc, self.msg_type)))
    }

    /// Parse `data` into `T`; a missing body is an error.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self
            .data
            .as_ref()
            .ok_or_else(|| RelayError::BadRequest(format!("{}.{} requires data", self.svc, self.msg_type)))?;
        self.parse_raw(raw)
    }

    /// Parse `data` into `T`, treating a missing body as `T::default()`.
    pub fn data_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match self.data.as_ref() {
            Some(raw) => self.parse_raw(raw),
            None => Ok(T::default()),
        }
    }

    fn parse_raw<T: DeserializeOwned>(&self, raw: &RawValue) -> Result<T> {
        serde_json::from_str(raw.get()).map_err(|e| {
            RelayError::BadRequest(format!("{}.{} invalid data: {e}", self.svc, self.msg_type))
        })
    }
}

/// Outbound frame (relay -> client).
#[derive(Debug, Serialize)]
pub struct Frame<'a, T: Serialize> {
    pub v: u8,
    pub svc: &'static str,
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<&'a str>,
    pub data: T,
}

impl<'a, T: Serialize> Frame<'a, T> {
    pub fn new(kind: EventKind, data: T) -> Self {
        Self {
            v: PROTOCOL_VERSION,
            svc: kind.svc(),
            msg_type: kind.msg_type(),
            seq: None,
            room: None,
            data,
        }
    }

    pub fn in_room(mut self, room: &'a str) -> Self {
        self.room = Some(room);
        self
    }

    pub fn with_seq(mut self, seq: Option<u64>) -> Self {
        self.seq = seq;
        self
    }

    /// Serialize once; callers share the string across recipients.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| RelayError::Internal(format!("json encode failed: {e}")))
    }
}
