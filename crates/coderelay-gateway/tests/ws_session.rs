//! Full transport sessions: the real router on an ephemeral port, driven by a
//! WebSocket client.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use coderelay_gateway::app_state::AppState;
use coderelay_gateway::config::RelayConfig;
use coderelay_gateway::router;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve(cfg: RelayConfig) -> (AppState, String) {
    let state = AppState::new(cfg).unwrap();
    let app = router::build_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    (state, format!("ws://{addr}/ws"))
}

async fn within<F: Future>(what: &str, fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}

/// Next JSON text frame; control frames are skipped.
async fn next_json(ws: &mut Ws) -> Value {
    within("a text frame", async {
        loop {
            let msg = ws.next().await.expect("stream ended").expect("recv failed");
            if msg.is_ping() || msg.is_pong() {
                continue;
            }
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    })
    .await
}

/// Skip frames until one of `svc.type` arrives.
async fn next_of(ws: &mut Ws, svc: &str, ty: &str) -> Value {
    loop {
        let f = next_json(ws).await;
        if f["svc"] == svc && f["type"] == ty {
            return f;
        }
    }
}

async fn send_json(ws: &mut Ws, v: Value) {
    ws.send(Message::text(v.to_string())).await.unwrap();
}

/// Connect and consume the greeting. Returns the assigned connection id.
async fn connect(url: &str) -> (Ws, String) {
    let (mut ws, _) = within("handshake", connect_async(url)).await.unwrap();
    let hello = next_json(&mut ws).await;
    assert_eq!(hello["svc"], "sys");
    assert_eq!(hello["type"], "hello");
    let id = hello["data"]["connectionId"].as_str().unwrap().to_string();
    (ws, id)
}

async fn join(ws: &mut Ws, room: &str, name: &str) -> Value {
    send_json(ws, json!({"v":1,"svc":"room","type":"join","room":room,"data":{"displayName":name}})).await;
    next_of(ws, "room", "joined").await
}

async fn wait_for_sessions(state: &AppState, n: usize) {
    within("session count", async {
        while state.realtime().session_count() != n {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}

#[tokio::test]
async fn hello_carries_the_connection_id() {
    let (state, url) = serve(RelayConfig::default()).await;
    let (mut a, id) = connect(&url).await;

    assert!(!id.is_empty());
    wait_for_sessions(&state, 1).await;

    // the greeted id is the one the relay routes by
    let joined = join(&mut a, "r", "Ann").await;
    assert_eq!(joined["data"]["connectionId"], id.as_str());
    assert_eq!(joined["data"]["roster"][0]["connectionId"], id.as_str());
}

#[tokio::test]
async fn closing_the_socket_announces_departure() {
    let (state, url) = serve(RelayConfig::default()).await;
    let (mut a, a_id) = connect(&url).await;
    let (mut b, _) = connect(&url).await;

    join(&mut a, "r", "Ann").await;
    join(&mut b, "r", "Bob").await;

    a.close(None).await.unwrap();

    let gone = next_of(&mut b, "room", "disconnected").await;
    assert_eq!(gone["room"], "r");
    assert_eq!(gone["data"]["connectionId"], a_id.as_str());
    assert_eq!(gone["data"]["displayName"], "Ann");

    wait_for_sessions(&state, 1).await;
    assert!(state.realtime().lock().registry().lookup(&a_id).is_unknown());
}

#[tokio::test]
async fn bad_frames_get_error_replies_and_the_session_survives() {
    let (_state, url) = serve(RelayConfig::default()).await;
    let (mut a, a_id) = connect(&url).await;

    send_json(&mut a, json!({"v":1,"svc":"nope","type":"x","seq":5})).await;
    let err = next_of(&mut a, "sys", "error").await;
    assert_eq!(err["data"]["code"], "UNKNOWN_EVENT");
    assert_eq!(err["seq"], 5);

    a.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();
    let err = next_of(&mut a, "sys", "error").await;
    assert_eq!(err["data"]["code"], "BAD_REQUEST");
    assert!(err.get("seq").is_none());

    let joined = join(&mut a, "r", "Ann").await;
    assert_eq!(joined["data"]["connectionId"], a_id.as_str());
}

#[tokio::test]
async fn silent_peer_is_purged_while_the_room_is_busy() {
    let mut cfg = RelayConfig::default();
    cfg.gateway.ping_interval_ms = 5000;
    cfg.gateway.idle_timeout_ms = 10000;
    let (state, url) = serve(cfg).await;

    let (mut a, a_id) = connect(&url).await;
    let (mut b, _) = connect(&url).await;
    join(&mut a, "r", "Ann").await;
    join(&mut b, "r", "Bob").await;

    // A never sends or reads again; B keeps relaying edits to it
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let deadline = tokio::time::sleep(Duration::from_secs(15));
    tokio::pin!(deadline);

    let gone = loop {
        tokio::select! {
            _ = tick.tick() => {
                send_json(&mut b, json!({"v":1,"svc":"code","type":"change","room":"r","data":{"text":"x"}})).await;
            }
            msg = b.next() => {
                let msg = msg.expect("stream ended").expect("recv failed");
                if msg.is_ping() || msg.is_pong() {
                    continue;
                }
                let f: Value = serde_json::from_str(msg.to_text().unwrap()).unwrap();
                if f["svc"] == "room" && f["type"] == "disconnected" {
                    break f;
                }
            }
            _ = &mut deadline => panic!("silent peer was never timed out"),
        }
    };

    assert_eq!(gone["data"]["connectionId"], a_id.as_str());
    wait_for_sessions(&state, 1).await;
    assert!(state.realtime().lock().registry().lookup(&a_id).is_unknown());

    drop(a);
}
