//! Decode-once codec for the transport layer.
//!
//! - Text frames => Envelope (lazy `RawValue` for data)
//! - Binary frames => rejected; the relay speaks JSON only
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use coderelay_core::{
    error::{Result, RelayError},
    protocol::Envelope,
};

#[derive(Debug)]
pub enum Inbound {
    Text { env: Envelope, bytes_len: usize },
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            let bytes_len = s.len();
            let env = Envelope::parse(&s)?;
            Ok(Inbound::Text { env, bytes_len })
        }
        Message::Binary(b) => Err(RelayError::BadRequest(format!(
            "binary frames are not supported ({} bytes)",
            b.len()
        ))),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
