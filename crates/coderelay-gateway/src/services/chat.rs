use async_trait::async_trait;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::payload::{ChatMessage, ChatSendReq};
use coderelay_core::protocol::{DisplayName, Envelope, EventKind, Frame};

use crate::dispatch::TextService;
use crate::realtime::{PreparedMsg, RealtimeCtx};

/// Chat fan-out to the whole room, sender included. Nothing is buffered, so
/// late joiners never see earlier messages.
#[derive(Default)]
pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextService for ChatService {
    fn svc(&self) -> &'static str {
        "chat"
    }

    async fn handle(&self, ctx: RealtimeCtx, kind: EventKind, env: Envelope) -> Result<()> {
        if kind != EventKind::ChatSend {
            return Err(RelayError::UnknownEvent {
                svc: env.svc.clone(),
                msg_type: env.msg_type.clone(),
            });
        }
        let room = env.require_room()?;
        let req: ChatSendReq = env.data_as()?;
        relay_chat(&ctx, room, req)
    }
}

pub fn relay_chat(ctx: &RealtimeCtx, room_id: &str, req: ChatSendReq) -> Result<()> {
    let me = ctx.connection_id();
    let guard = ctx.lock();
    if !guard.registry().contains(me) {
        tracing::debug!(conn = %me, "chat before join; dropped");
        return Ok(());
    }

    // the client-supplied name wins; fall back to the one given at join
    let display_name = match req.display_name {
        Some(name) => DisplayName::Known(name),
        None => guard.registry().lookup(me),
    };
    let frame = Frame::new(
        EventKind::ChatMessage,
        ChatMessage {
            message: req.message,
            display_name,
        },
    );
    let msg = PreparedMsg::prepare(&frame)?;
    let sent = guard.send_to_group_including(room_id, &msg);

    tracing::debug!(conn = %me, room = %room_id, sent, "chat relayed");
    Ok(())
}
