//! Realtime core components for the relay runtime.
//!
//! Connection registry, room table, the outbound session table, and the
//! egress runtime/context shared across services.

mod realtime;
mod registry;
mod rooms;
mod session_registry;

pub use realtime::{
    egress_drop_count, egress_send_fail_count, try_enqueue, RealtimeCore, RealtimeCtx, RelayGuard,
};
pub use registry::ConnectionRegistry;
pub use rooms::{Room, RoomTable};
pub use session_registry::{Connection, SessionRegistry};
