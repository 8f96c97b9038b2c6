//! coderelay gateway library entry.
//!
//! This crate wires the WebSocket transport, dispatcher, realtime core, and
//! relay services into a running session relay. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
