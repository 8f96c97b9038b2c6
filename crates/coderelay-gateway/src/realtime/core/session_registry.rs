use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// One session's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

/// Outbound session table: `connection_id -> Connection`.
///
/// Transport plumbing only; room membership and display names live in the
/// relay state behind `RealtimeCore`'s lock.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Connection>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn insert(&self, connection_id: String, conn: Connection) {
        self.sessions.insert(connection_id, conn);
    }

    pub fn remove(&self, connection_id: &str) -> Option<Connection> {
        self.sessions.remove(connection_id).map(|(_, conn)| conn)
    }

    pub fn get(&self, connection_id: &str) -> Option<Connection> {
        self.sessions.get(connection_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
