//! coderelay core: transport-agnostic wire contracts and the shared error type.
//!
//! This crate defines the JSON envelope, the event catalog, and the typed
//! payloads exchanged between editor clients and the session relay. It
//! carries no transport or runtime dependencies so the same contracts can be
//! reused by the gateway, by tests, and by client tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input surfaces as `RelayError` so the relay never crashes on
//! bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RelayError};
