//! WebSocket session loop.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS
//! - Mint a connection id and register the outbound queue with the hub
//! - Lifecycle: ping/pong + idle timeout
//! - Decode-once, then hand each event to the connection's session
//!
//! Events from one connection are handled strictly in arrival order on this
//! task, and disconnect cleanup runs on the same task, so cleanup cannot race
//! an explicit leave from the same connection.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use pairlink_core::protocol::ConnectionId;

use crate::app_state::AppState;
use crate::signaling::session::SignalingSession;
use crate::transport::codec::{decode, Inbound};

/// Outbound queue depth per connection. Relays are fire-and-forget; frames
/// beyond this are dropped rather than applying backpressure to the sender.
const OUTBOUND_QUEUE: usize = 64;

pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_session(app, socket))
}

async fn run_session(app: AppState, socket: WebSocket) {
    let conn_id = ConnectionId::new();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);

    let hub = app.hub();
    hub.register(conn_id, out_tx);
    let session = SignalingSession::new(conn_id, hub.clone());

    tracing::info!(conn = %conn_id, "connection established");

    let (mut ws_tx, mut ws_rx) = socket.split();

    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                match decode(msg) {
                    Ok(Inbound::Event(event)) => session.handle(event),
                    Ok(Inbound::Ping(payload)) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        // A malformed frame never destabilizes the session.
                        tracing::debug!(conn = %conn_id, error = %e, "dropped undecodable frame");
                    }
                }
            }

            // heartbeat + idle timeout
            _ = ping_tick.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
                if last_activity.elapsed() >= idle_timeout {
                    tracing::debug!(conn = %conn_id, "idle timeout");
                    break;
                }
            }
        }
    }

    // Unified cleanup path: disconnect behaves exactly like an explicit leave.
    session.disconnect();
    hub.unregister(&conn_id);
    tracing::info!(conn = %conn_id, "connection closed");
}
