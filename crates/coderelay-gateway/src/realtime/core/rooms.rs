use std::collections::HashMap;

use indexmap::IndexSet;

/// One room's member set, kept in join order. The room id is its table key.
#[derive(Debug, Default)]
pub struct Room {
    members: IndexSet<String>,
}

impl Room {
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Room membership: room_id -> members, connection_id -> rooms.
///
/// Rooms exist only while they have members; the last leave drops the room.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<String, Room>,
    memberships: HashMap<String, IndexSet<String>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the connection was already a member.
    pub fn join(&mut self, room_id: &str, connection_id: &str) -> bool {
        let added = self
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .members
            .insert(connection_id.to_string());

        self.memberships
            .entry(connection_id.to_string())
            .or_default()
            .insert(room_id.to_string());

        added
    }

    /// Returns false if the connection was not a member.
    pub fn leave(&mut self, room_id: &str, connection_id: &str) -> bool {
        let mut removed = false;
        if let Some(room) = self.rooms.get_mut(room_id) {
            removed = room.members.shift_remove(connection_id);
            if room.is_empty() {
                self.rooms.remove(room_id);
            }
        }
        if let Some(set) = self.memberships.get_mut(connection_id) {
            set.shift_remove(room_id);
            if set.is_empty() {
                self.memberships.remove(connection_id);
            }
        }
        removed
    }

    /// Drop every membership of a connection. Returns the rooms it left.
    pub fn leave_all(&mut self, connection_id: &str) -> Vec<String> {
        let Some(rooms) = self.memberships.remove(connection_id) else {
            return vec![];
        };
        for room_id in &rooms {
            if let Some(room) = self.rooms.get_mut(room_id) {
                room.members.shift_remove(connection_id);
                if room.is_empty() {
                    self.rooms.remove(room_id);
                }
            }
        }
        rooms.into_iter().collect()
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Members in join order; empty for an unknown room.
    pub fn members_of(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|r| r.members().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Rooms in the order the connection joined them (self-room first).
    pub fn rooms_of(&self, connection_id: &str) -> Vec<String> {
        self.memberships
            .get(connection_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
