use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::ws::Message;
use tokio::sync::mpsc::{self, error::TrySendError};

use coderelay_core::protocol::payload::RosterEntry;

use crate::realtime::core::{Connection, ConnectionRegistry, RoomTable, SessionRegistry};
use crate::realtime::types::PreparedMsg;

static EGRESS_DROP_COUNT: AtomicU64 = AtomicU64::new(0);
static EGRESS_SEND_FAIL_COUNT: AtomicU64 = AtomicU64::new(0);

/// Messages dropped because a recipient's outbound queue was full.
pub fn egress_drop_count() -> u64 {
    EGRESS_DROP_COUNT.load(Ordering::Relaxed)
}

/// Messages addressed to a session whose writer already went away.
pub fn egress_send_fail_count() -> u64 {
    EGRESS_SEND_FAIL_COUNT.load(Ordering::Relaxed)
}

/// Non-blocking enqueue onto a session's outbound queue.
///
/// A full queue drops the message and counts it; a closed queue counts as a
/// send failure. Returns whether the message was queued.
pub fn try_enqueue(tx: &mpsc::Sender<Message>, msg: Message) -> bool {
    match tx.try_send(msg) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            EGRESS_DROP_COUNT.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("outbound queue full; message dropped");
            false
        }
        Err(TrySendError::Closed(_)) => {
            EGRESS_SEND_FAIL_COUNT.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

/// Everything the relay handlers read or write. Guarded by one mutex.
#[derive(Debug, Default)]
struct RelayState {
    registry: ConnectionRegistry,
    rooms: RoomTable,
}

/// RealtimeCore: relay state plus the egress engine.
///
/// Handlers run on a multi-threaded runtime, so the connection registry and
/// room table share a single lock. A handler takes the lock once, mutates
/// state, computes recipients and enqueues every delivery before releasing
/// it. Enqueueing is `try_send`, so nothing awaits under the lock.
pub struct RealtimeCore {
    sessions: SessionRegistry,
    state: Mutex<RelayState>,
}

impl Default for RealtimeCore {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeCore {
    pub fn new() -> Self {
        Self {
            sessions: SessionRegistry::new(),
            state: Mutex::new(RelayState::default()),
        }
    }

    /// Register a live transport session under a fresh connection id.
    ///
    /// The connection is placed in its self-room (named after its own id)
    /// immediately.
    pub fn attach(&self, tx: mpsc::Sender<Message>) -> String {
        let connection_id = uuid::Uuid::new_v4().to_string();
        self.attach_with_id(connection_id.clone(), tx);
        connection_id
    }

    /// Same as `attach` with a caller-chosen id.
    pub fn attach_with_id(&self, connection_id: String, tx: mpsc::Sender<Message>) {
        let mut guard = self.lock();
        guard.rooms_mut().join(&connection_id, &connection_id);
        self.sessions.insert(connection_id, Connection { tx });
    }

    /// Drop all memberships and the outbound sender.
    ///
    /// Call only after departure has been announced; announcements need the
    /// memberships this removes.
    pub fn detach(&self, connection_id: &str) {
        let mut guard = self.lock();
        guard.rooms_mut().leave_all(connection_id);
        self.sessions.remove(connection_id);
    }

    /// Enter the relay's single mutual-exclusion domain.
    pub fn lock(&self) -> RelayGuard<'_> {
        RelayGuard {
            state: self.state.lock().unwrap_or_else(PoisonError::into_inner),
            core: self,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn room_count(&self) -> usize {
        self.lock().rooms().room_count()
    }

    /// Fire-and-forget enqueue to one connection's writer.
    fn deliver(&self, connection_id: &str, msg: &PreparedMsg) -> bool {
        let Some(conn) = self.sessions.get(connection_id) else {
            return false;
        };
        try_enqueue(&conn.tx, msg.to_ws_message())
    }
}

/// Exclusive access to relay state plus the delivery primitives.
///
/// Deliveries made through the guard are ordered with respect to every other
/// handler because they happen while the lock is held.
pub struct RelayGuard<'a> {
    state: MutexGuard<'a, RelayState>,
    core: &'a RealtimeCore,
}

impl RelayGuard<'_> {
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.state.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConnectionRegistry {
        &mut self.state.registry
    }

    pub fn rooms(&self) -> &RoomTable {
        &self.state.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomTable {
        &mut self.state.rooms
    }

    /// Current members of a room with their display names.
    pub fn roster(&self, room_id: &str) -> Vec<RosterEntry> {
        let Some(room) = self.state.rooms.get(room_id) else {
            return vec![];
        };
        room.members()
            .map(|id| RosterEntry {
                connection_id: id.to_string(),
                display_name: self.state.registry.lookup(id),
            })
            .collect()
    }

    /// Absent target is a silent no-op.
    pub fn send_to_one(&self, connection_id: &str, msg: &PreparedMsg) -> bool {
        self.core.deliver(connection_id, msg)
    }

    /// Returns the number of messages enqueued.
    pub fn send_to_group_except(&self, room_id: &str, exclude: &str, msg: &PreparedMsg) -> usize {
        let Some(room) = self.state.rooms.get(room_id) else {
            return 0;
        };
        room.members()
            .filter(|id| *id != exclude)
            .filter(|id| self.core.deliver(id, msg))
            .count()
    }

    /// Returns the number of messages enqueued.
    pub fn send_to_group_including(&self, room_id: &str, msg: &PreparedMsg) -> usize {
        let Some(room) = self.state.rooms.get(room_id) else {
            return 0;
        };
        room.members().filter(|id| self.core.deliver(id, msg)).count()
    }
}

/// Per-message context passed to services (borrow tools instead of owning).
#[derive(Clone)]
pub struct RealtimeCtx {
    connection_id: Arc<str>,
    core: Arc<RealtimeCore>,
}

impl RealtimeCtx {
    pub fn new(connection_id: impl Into<Arc<str>>, core: Arc<RealtimeCore>) -> Self {
        Self {
            connection_id: connection_id.into(),
            core,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn core(&self) -> &RealtimeCore {
        &self.core
    }

    pub fn lock(&self) -> RelayGuard<'_> {
        self.core.lock()
    }
}
