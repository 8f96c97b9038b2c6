//! Realtime runtime for the relay: shared state and delivery primitives.

pub mod core;
pub mod types;

pub use self::core::{
    try_enqueue, ConnectionRegistry, RealtimeCore, RealtimeCtx, RelayGuard, Room, RoomTable,
    SessionRegistry,
};
pub use types::PreparedMsg;
