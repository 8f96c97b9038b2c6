use async_trait::async_trait;
use serde_json::value::RawValue;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::payload::{CursorMoveReq, CursorMoved};
use coderelay_core::protocol::{Envelope, EventKind, Frame};

use crate::dispatch::TextService;
use crate::realtime::{PreparedMsg, RealtimeCtx};

/// Stateless cursor forwarding. No position is remembered server-side.
#[derive(Default)]
pub struct CursorService;

impl CursorService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextService for CursorService {
    fn svc(&self) -> &'static str {
        "cursor"
    }

    async fn handle(&self, ctx: RealtimeCtx, kind: EventKind, env: Envelope) -> Result<()> {
        if kind != EventKind::CursorMove {
            return Err(RelayError::UnknownEvent {
                svc: env.svc.clone(),
                msg_type: env.msg_type.clone(),
            });
        }
        let room = env.require_room()?;
        let req: CursorMoveReq = env.data_as()?;
        relay_cursor(&ctx, room, req.cursor)
    }
}

/// Forward a position to every other member. Dropped until the sender has joined.
pub fn relay_cursor(ctx: &RealtimeCtx, room_id: &str, cursor: Box<RawValue>) -> Result<()> {
    let me = ctx.connection_id();
    let frame = Frame::new(
        EventKind::CursorMove,
        CursorMoved {
            sender_connection_id: me.to_string(),
            cursor,
        },
    );
    let msg = PreparedMsg::prepare(&frame)?;

    let guard = ctx.lock();
    if !guard.registry().contains(me) {
        tracing::debug!(conn = %me, "cursor before join; dropped");
        return Ok(());
    }
    guard.send_to_group_except(room_id, me, &msg);
    Ok(())
}
