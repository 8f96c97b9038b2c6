use std::collections::HashMap;

use coderelay_core::protocol::DisplayName;

/// Connection registry: `connection_id -> display name`.
///
/// Entries are written on JOIN and removed on disconnect. Lookups never
/// fail; a miss resolves to `DisplayName::Unknown`.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    names: HashMap<String, DisplayName>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite.
    pub fn register(&mut self, connection_id: &str, name: DisplayName) {
        self.names.insert(connection_id.to_string(), name);
    }

    pub fn lookup(&self, connection_id: &str) -> DisplayName {
        self.names.get(connection_id).cloned().unwrap_or_default()
    }

    /// True once the connection has completed at least one JOIN.
    pub fn contains(&self, connection_id: &str) -> bool {
        self.names.contains_key(connection_id)
    }

    /// No-op when absent.
    pub fn remove(&mut self, connection_id: &str) {
        self.names.remove(connection_id);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
