//! Document text relay: `code.change` (room, excluding sender) and
//! `code.sync` (one target, used for late-join catch-up).
//!
//! Text is a full replacement and is never stored.

use async_trait::async_trait;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::payload::{CodeChangeReq, CodeText, SyncCodeReq};
use coderelay_core::protocol::{Envelope, EventKind, Frame};

use crate::dispatch::TextService;
use crate::realtime::{PreparedMsg, RealtimeCtx};

#[derive(Default)]
pub struct CodeService;

impl CodeService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextService for CodeService {
    fn svc(&self) -> &'static str {
        "code"
    }

    async fn handle(&self, ctx: RealtimeCtx, kind: EventKind, env: Envelope) -> Result<()> {
        match kind {
            EventKind::CodeChange => {
                let room = env.require_room()?;
                let req: CodeChangeReq = env.data_as()?;
                relay_change(&ctx, room, req.text)
            }
            EventKind::SyncCode => {
                let req: SyncCodeReq = env.data_as()?;
                push_sync(&ctx, &req.target_connection_id, req.text)
            }
            _ => Err(RelayError::UnknownEvent {
                svc: env.svc.clone(),
                msg_type: env.msg_type.clone(),
            }),
        }
    }
}

pub fn relay_change(ctx: &RealtimeCtx, room_id: &str, text: String) -> Result<()> {
    let bytes = text.len();
    let msg = PreparedMsg::prepare(&Frame::new(EventKind::CodeChange, CodeText { text }))?;

    let guard = ctx.lock();
    let sent = guard.send_to_group_except(room_id, ctx.connection_id(), &msg);

    tracing::debug!(conn = %ctx.connection_id(), room = %room_id, bytes, sent, "code change relayed");
    Ok(())
}

/// Deliver text as a `code.change` to exactly one connection, ignoring rooms.
pub fn push_sync(ctx: &RealtimeCtx, target: &str, text: String) -> Result<()> {
    let msg = PreparedMsg::prepare(&Frame::new(EventKind::CodeChange, CodeText { text }))?;

    let guard = ctx.lock();
    let delivered = guard.send_to_one(target, &msg);

    tracing::debug!(conn = %ctx.connection_id(), target = %target, delivered, "code sync pushed");
    Ok(())
}
