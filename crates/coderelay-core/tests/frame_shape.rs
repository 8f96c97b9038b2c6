//! Outbound frame shape tests: what clients actually receive.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use coderelay_core::protocol::payload::{
    ChatMessage, CursorMoved, Disconnected, Joined, RosterEntry,
};
use coderelay_core::protocol::{DisplayName, EventKind, Frame};

fn to_value<T: serde::Serialize>(frame: &Frame<'_, T>) -> Value {
    serde_json::from_str(&frame.to_json().unwrap()).unwrap()
}

#[test]
fn joined_frame_is_camel_case_and_room_scoped() {
    let data = Joined {
        roster: vec![
            RosterEntry { connection_id: "a".into(), display_name: "Ann".into() },
            RosterEntry { connection_id: "b".into(), display_name: DisplayName::Unknown },
        ],
        display_name: DisplayName::Unknown,
        connection_id: "b".into(),
    };
    let v = to_value(&Frame::new(EventKind::Joined, data).in_room("room1"));

    assert_eq!(
        v,
        json!({
            "v": 1,
            "svc": "room",
            "type": "joined",
            "room": "room1",
            "data": {
                "roster": [
                    { "connectionId": "a", "displayName": "Ann" },
                    { "connectionId": "b", "displayName": null }
                ],
                "displayName": null,
                "connectionId": "b"
            }
        })
    );
}

#[test]
fn frame_without_room_omits_the_field() {
    let data = ChatMessage { message: "hi".into(), display_name: "Ann".into() };
    let v = to_value(&Frame::new(EventKind::ChatMessage, data));
    assert!(v.get("room").is_none());
    assert!(v.get("seq").is_none());
    assert_eq!(v["svc"], "chat");
    assert_eq!(v["type"], "message");
    assert_eq!(v["data"], json!({ "message": "hi", "displayName": "Ann" }));
}

#[test]
fn cursor_is_forwarded_verbatim() {
    let cursor = serde_json::value::RawValue::from_string(r#"{"line":3,"ch":14}"#.into()).unwrap();
    let data = CursorMoved { sender_connection_id: "a".into(), cursor };
    let s = Frame::new(EventKind::CursorMove, data).to_json().unwrap();
    assert!(s.contains(r#""cursor":{"line":3,"ch":14}"#), "frame={s}");
    assert!(s.contains(r#""senderConnectionId":"a""#), "frame={s}");
}

#[test]
fn disconnected_round_trips_unknown_name() {
    let data = Disconnected { connection_id: "b".into(), display_name: DisplayName::Unknown };
    let s = Frame::new(EventKind::Disconnected, data).in_room("room1").to_json().unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();
    let back: Disconnected = serde_json::from_value(v["data"].clone()).unwrap();
    assert_eq!(back.connection_id, "b");
    assert!(back.display_name.is_unknown());
}

#[test]
fn inbound_catalog_excludes_server_events() {
    for kind in [EventKind::Hello, EventKind::Error, EventKind::Joined, EventKind::Disconnected, EventKind::ChatMessage] {
        assert_eq!(EventKind::inbound(kind.svc(), kind.msg_type()), None, "kind={kind:?}");
    }
    for kind in [EventKind::Join, EventKind::Leave, EventKind::CodeChange, EventKind::SyncCode, EventKind::CursorMove, EventKind::ChatSend] {
        assert_eq!(EventKind::inbound(kind.svc(), kind.msg_type()), Some(kind));
    }
}
