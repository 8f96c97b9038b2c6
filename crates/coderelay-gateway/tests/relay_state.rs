//! Connection registry and room table semantics, independent of transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use coderelay_core::protocol::DisplayName;
use coderelay_gateway::realtime::{ConnectionRegistry, RoomTable};

#[test]
fn registry_lookup_miss_is_unknown() {
    let reg = ConnectionRegistry::new();
    assert_eq!(reg.lookup("ghost"), DisplayName::Unknown);
    assert!(!reg.contains("ghost"));
}

#[test]
fn registry_register_overwrites() {
    let mut reg = ConnectionRegistry::new();
    reg.register("a", "Ann".into());
    reg.register("a", "Annie".into());
    assert_eq!(reg.lookup("a").as_deref(), Some("Annie"));
    assert_eq!(reg.len(), 1);
}

#[test]
fn registry_absent_name_is_still_registered() {
    let mut reg = ConnectionRegistry::new();
    reg.register("a", DisplayName::Unknown);
    assert!(reg.contains("a"));
    assert!(reg.lookup("a").is_unknown());
}

#[test]
fn registry_remove_is_idempotent() {
    let mut reg = ConnectionRegistry::new();
    reg.register("a", "Ann".into());
    reg.remove("a");
    reg.remove("a");
    reg.remove("never-there");
    assert!(reg.is_empty());
    assert!(reg.lookup("a").is_unknown());
}

#[test]
fn rooms_keep_join_order_and_ignore_duplicates() {
    let mut rooms = RoomTable::new();
    assert!(rooms.join("r", "a"));
    assert!(rooms.join("r", "b"));
    assert!(!rooms.join("r", "a"));
    assert_eq!(rooms.members_of("r"), ["a", "b"]);
}

#[test]
fn rooms_track_memberships_per_connection() {
    let mut rooms = RoomTable::new();
    rooms.join("a", "a");
    rooms.join("r1", "a");
    rooms.join("r2", "a");
    assert_eq!(rooms.rooms_of("a"), ["a", "r1", "r2"]);

    assert!(rooms.leave("r1", "a"));
    assert!(!rooms.leave("r1", "a"));
    assert_eq!(rooms.rooms_of("a"), ["a", "r2"]);
}

#[test]
fn empty_rooms_are_garbage_collected() {
    let mut rooms = RoomTable::new();
    rooms.join("r", "a");
    rooms.join("r", "b");
    rooms.leave("r", "a");
    assert_eq!(rooms.room_count(), 1);
    rooms.leave("r", "b");
    assert_eq!(rooms.room_count(), 0);
    assert!(rooms.get("r").is_none());
    assert!(rooms.members_of("r").is_empty());
}

#[test]
fn leave_all_returns_every_room_and_keeps_others() {
    let mut rooms = RoomTable::new();
    rooms.join("r1", "a");
    rooms.join("r2", "a");
    rooms.join("r2", "b");

    let mut left = rooms.leave_all("a");
    left.sort();
    assert_eq!(left, ["r1", "r2"]);
    assert!(rooms.rooms_of("a").is_empty());
    assert_eq!(rooms.members_of("r2"), ["b"]);
    assert_eq!(rooms.room_count(), 1);

    assert!(rooms.leave_all("a").is_empty());
}
