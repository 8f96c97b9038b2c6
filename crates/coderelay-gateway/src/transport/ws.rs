//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS and assign a connection id
//! - Greet the client with `sys.hello` carrying that id
//! - Lifecycle: ping/pong, idle timeout, bounded socket writes
//! - Decode-once, then dispatch each envelope to exactly one service
//! - Run the disconnect path when the session ends, however it ends

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::payload::{ErrorBody, Hello};
use coderelay_core::protocol::{EventKind, Frame};

use crate::app_state::AppState;
use crate::realtime::{try_enqueue, RealtimeCtx};
use crate::services::session::handle_disconnect;
use crate::transport::codec::{decode, Inbound};

// --------------------
// Frame builders
// --------------------
fn sys_hello_json(connection_id: &str) -> Result<String> {
    Frame::new(
        EventKind::Hello,
        Hello {
            connection_id: connection_id.to_string(),
        },
    )
    .to_json()
}

fn sys_error_json(code: &str, msg: &str, seq: Option<u64>) -> Result<String> {
    Frame::new(
        EventKind::Error,
        ErrorBody {
            code: code.to_string(),
            msg: msg.to_string(),
        },
    )
    .with_seq(seq)
    .to_json()
}

/// Queue an error frame without awaiting; the writer lives in this same task.
fn report(out_tx: &mpsc::Sender<Message>, err: &RelayError, seq: Option<u64>) {
    match sys_error_json(err.client_code().as_str(), &err.to_string(), seq) {
        Ok(s) => {
            try_enqueue(out_tx, Message::Text(s));
        }
        Err(e) => tracing::warn!(error = %e, "error frame encode failed"),
    }
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if app.is_draining() {
        return (StatusCode::SERVICE_UNAVAILABLE, "draining").into_response();
    }
    app.metrics().ws_upgrades.inc(&[]);
    ws.on_upgrade(move |socket| run_session(app, socket))
}

async fn run_session(app: AppState, socket: WebSocket) {
    let (out_tx, out_rx) = mpsc::channel::<Message>(app.cfg().gateway.outbound_queue);
    let core = app.realtime();
    let connection_id = core.attach(out_tx.clone());
    let ctx = RealtimeCtx::new(connection_id.as_str(), Arc::clone(&core));

    let span = tracing::info_span!("session", conn = %connection_id);
    async {
        app.metrics().ws_active_sessions.inc(&[]);
        tracing::info!("connected");

        if let Err(e) = session_loop(&app, &ctx, socket, out_tx, out_rx).await {
            tracing::warn!(error = %e, "session ended with error");
        }

        // memberships are still intact here; announce, then purge
        handle_disconnect(&ctx);
        app.metrics().ws_active_sessions.dec(&[]);
    }
    .instrument(span)
    .await
}

// --------------------
// Core session loop
// --------------------
async fn session_loop(
    app: &AppState,
    ctx: &RealtimeCtx,
    socket: WebSocket,
    out_tx: mpsc::Sender<Message>,
    mut out_rx: mpsc::Receiver<Message>,
) -> Result<()> {
    let dispatcher = app.dispatcher();
    let metrics = app.metrics();

    // ---- split socket
    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- greet: the client needs its id to address code.sync replies
    out_tx
        .try_send(Message::Text(sys_hello_json(ctx.connection_id())?))
        .map_err(|_| RelayError::Transport("outbound channel closed".into()))?;

    // ---- timers
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let write_timeout = Duration::from_millis(gw.write_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    // only inbound frames move the deadline; outbound traffic never does
    let idle = tokio::time::sleep(idle_timeout);
    tokio::pin!(idle);

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                match tokio::time::timeout(write_timeout, ws_tx.send(m)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => return Err(RelayError::Transport(format!("send failed: {e}"))),
                    Err(_) => {
                        metrics.writer_timeouts.inc(&[]);
                        return Err(RelayError::Transport("socket write timed out".into()));
                    }
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = incoming.map_err(|e| RelayError::Transport(format!("recv failed: {e}")))?;

                idle.as_mut().reset(Instant::now() + idle_timeout);

                match decode(msg) {
                    Ok(Inbound::Text { env, bytes_len }) => {
                        let seq = env.seq;
                        let label = env.kind().map(EventKind::label).unwrap_or_else(|_| "unknown".to_string());
                        let started = std::time::Instant::now();

                        let res = dispatcher.dispatch_text(ctx.clone(), env).await;
                        metrics.dispatch_duration.observe(&[("event", label.as_str())], started.elapsed());

                        match res {
                            Ok(()) => metrics.events.inc(&[("event", label.as_str())]),
                            Err(e) => {
                                let code = e.client_code().as_str();
                                metrics.service_errors.inc(&[("event", label.as_str()), ("code", code)]);
                                tracing::warn!(event = %label, bytes_len, error = %e, "event rejected");
                                report(&out_tx, &e, seq);
                            }
                        }
                    }
                    Ok(Inbound::Ping(payload)) => {
                        try_enqueue(&out_tx, Message::Pong(payload));
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        metrics.decode_errors.inc(&[("code", e.client_code().as_str())]);
                        tracing::warn!(error = %e, "decode failed");
                        report(&out_tx, &e, None);
                    }
                }
            }

            // ping
            _ = ping_tick.tick() => {
                try_enqueue(&out_tx, Message::Ping(Vec::new()));
            }

            // idle timeout
            _ = &mut idle => {
                tracing::info!("idle timeout");
                let _ = tokio::time::timeout(write_timeout, ws_tx.send(Message::Close(None))).await;
                break;
            }
        }
    }

    Ok(())
}
