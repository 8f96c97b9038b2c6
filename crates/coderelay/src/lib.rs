//! Top-level facade crate for coderelay.
//!
//! Re-exports the wire contracts and the gateway library so users can depend on a single crate.

pub mod core {
    pub use coderelay_core::*;
}

pub mod gateway {
    pub use coderelay_gateway::*;
}
