//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler and the codec that decodes messages once
//! before they reach the dispatcher.

pub mod codec;
pub mod ws;
