//! Room admission and departure: `room.join`, `room.leave`, and the
//! disconnect path run by the transport at teardown.

use async_trait::async_trait;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::payload::{Disconnected, JoinReq, Joined};
use coderelay_core::protocol::{DisplayName, Envelope, EventKind, Frame};

use crate::dispatch::TextService;
use crate::realtime::{PreparedMsg, RealtimeCtx, RelayGuard};

#[derive(Default)]
pub struct RoomService;

impl RoomService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextService for RoomService {
    fn svc(&self) -> &'static str {
        "room"
    }

    async fn handle(&self, ctx: RealtimeCtx, kind: EventKind, env: Envelope) -> Result<()> {
        match kind {
            EventKind::Join => {
                let room = env.require_room()?;
                let req: JoinReq = env.data_or_default()?;
                join(&ctx, room, req.display_name)
            }
            EventKind::Leave => leave(&ctx, env.require_room()?),
            _ => Err(RelayError::UnknownEvent {
                svc: env.svc.clone(),
                msg_type: env.msg_type.clone(),
            }),
        }
    }
}

/// Admit the connection into `room_id` and tell every member about it.
///
/// Each member, the newcomer included, gets its own `room.joined` delivery.
/// Existing members answer theirs with a `code.sync` aimed at the newcomer.
pub fn join(ctx: &RealtimeCtx, room_id: &str, display_name: DisplayName) -> Result<()> {
    let me = ctx.connection_id();
    let mut guard = ctx.lock();

    guard.registry_mut().register(me, display_name.clone());
    guard.rooms_mut().join(room_id, me);

    let frame = Frame::new(
        EventKind::Joined,
        Joined {
            roster: guard.roster(room_id),
            display_name,
            connection_id: me.to_string(),
        },
    )
    .in_room(room_id);
    let msg = PreparedMsg::prepare(&frame)?;

    for member in &frame.data.roster {
        guard.send_to_one(&member.connection_id, &msg);
    }

    tracing::info!(
        conn = %me,
        room = %room_id,
        name = %frame.data.display_name,
        members = frame.data.roster.len(),
        "joined room"
    );
    Ok(())
}

/// Leave one room; the remaining members see `room.disconnected`.
///
/// The self-room cannot be left and the registry entry is kept.
pub fn leave(ctx: &RealtimeCtx, room_id: &str) -> Result<()> {
    let me = ctx.connection_id();
    if room_id == me {
        return Ok(());
    }

    let mut guard = ctx.lock();
    if !guard.rooms_mut().leave(room_id, me) {
        return Ok(());
    }
    let display_name = guard.registry().lookup(me);
    announce_departure(&guard, room_id, me, display_name)?;

    tracing::info!(conn = %me, room = %room_id, "left room");
    Ok(())
}

/// Teardown path: announce departure in every room, then purge.
///
/// Must run while memberships are still in place. Never fails; an encode
/// error for one room is logged and the remaining rooms are still processed.
pub fn handle_disconnect(ctx: &RealtimeCtx) {
    let me = ctx.connection_id();
    {
        let mut guard = ctx.lock();
        let display_name = guard.registry().lookup(me);
        let rooms = guard.rooms().rooms_of(me);

        for room_id in &rooms {
            if let Err(e) = announce_departure(&guard, room_id, me, display_name.clone()) {
                tracing::warn!(conn = %me, room = %room_id, error = %e, "departure announce failed");
            }
        }

        guard.registry_mut().remove(me);
        guard.rooms_mut().leave_all(me);

        tracing::info!(conn = %me, name = %display_name, rooms = rooms.len(), "disconnected");
    }
    ctx.core().detach(me);
}

fn announce_departure(
    guard: &RelayGuard<'_>,
    room_id: &str,
    connection_id: &str,
    display_name: DisplayName,
) -> Result<()> {
    let frame = Frame::new(
        EventKind::Disconnected,
        Disconnected {
            connection_id: connection_id.to_string(),
            display_name,
        },
    )
    .in_room(room_id);
    let msg = PreparedMsg::prepare(&frame)?;
    guard.send_to_group_except(room_id, connection_id, &msg);
    Ok(())
}
