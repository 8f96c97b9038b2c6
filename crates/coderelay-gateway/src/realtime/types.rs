use axum::extract::ws::Message;
use serde::Serialize;

use coderelay_core::error::Result;
use coderelay_core::protocol::Frame;

/// Prepared message cached for fan-out (serialize once, send N times).
#[derive(Debug, Clone)]
pub struct PreparedMsg {
    text: String,
}

impl PreparedMsg {
    pub fn prepare<T: Serialize>(frame: &Frame<'_, T>) -> Result<Self> {
        Ok(Self {
            text: frame.to_json()?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Convert to axum::ws::Message for transport.
    /// NOTE: axum 0.7 text frames own a `String`, so each recipient gets a clone.
    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.text.clone())
    }
}
