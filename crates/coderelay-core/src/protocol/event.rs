//! Event catalog: maps `svc`/`type` pairs to a closed set of event kinds.

pub const SVC_SYS: &str = "sys";
pub const SVC_ROOM: &str = "room";
pub const SVC_CODE: &str = "code";
pub const SVC_CURSOR: &str = "cursor";
pub const SVC_CHAT: &str = "chat";

/// Every event that crosses the wire, in either direction.
///
/// `CodeChange` and `CursorMove` use the same svc/type pair in both
/// directions; only the payload shape differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Server greeting carrying the transport-assigned connection id.
    Hello,
    /// Per-frame error reported back to the sender.
    Error,
    Join,
    Joined,
    Leave,
    Disconnected,
    CodeChange,
    SyncCode,
    CursorMove,
    ChatSend,
    ChatMessage,
}

impl EventKind {
    pub fn svc(self) -> &'static str {
        match self {
            EventKind::Hello | EventKind::Error => SVC_SYS,
            EventKind::Join | EventKind::Joined | EventKind::Leave | EventKind::Disconnected => {
                SVC_ROOM
            }
            EventKind::CodeChange | EventKind::SyncCode => SVC_CODE,
            EventKind::CursorMove => SVC_CURSOR,
            EventKind::ChatSend | EventKind::ChatMessage => SVC_CHAT,
        }
    }

    /// Value of the envelope `type` field.
    pub fn msg_type(self) -> &'static str {
        match self {
            EventKind::Hello => "hello",
            EventKind::Error => "error",
            EventKind::Join => "join",
            EventKind::Joined => "joined",
            EventKind::Leave => "leave",
            EventKind::Disconnected => "disconnected",
            EventKind::CodeChange => "change",
            EventKind::SyncCode => "sync",
            EventKind::CursorMove => "move",
            EventKind::ChatSend => "send",
            EventKind::ChatMessage => "message",
        }
    }

    /// Resolve a client-originated svc/type pair.
    ///
    /// Server-only kinds (`Hello`, `Joined`, ...) are never accepted inbound.
    pub fn inbound(svc: &str, msg_type: &str) -> Option<Self> {
        let kind = match (svc, msg_type) {
            (SVC_ROOM, "join") => EventKind::Join,
            (SVC_ROOM, "leave") => EventKind::Leave,
            (SVC_CODE, "change") => EventKind::CodeChange,
            (SVC_CODE, "sync") => EventKind::SyncCode,
            (SVC_CURSOR, "move") => EventKind::CursorMove,
            (SVC_CHAT, "send") => EventKind::ChatSend,
            _ => return None,
        };
        Some(kind)
    }

    /// Stable label for logs and metrics, e.g. `code.change`.
    pub fn label(self) -> String {
        format!("{}.{}", self.svc(), self.msg_type())
    }
}
