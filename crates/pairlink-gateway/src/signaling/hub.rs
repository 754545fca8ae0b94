//! Egress engine: per-connection outbound queues plus the room registry.
//!
//! All sends are fire-and-forget `try_send`: a slow or vanished peer drops
//! frames instead of blocking the sender's event loop. Backpressure, if any,
//! is the transport's concern, not the relay's.

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

use pairlink_core::protocol::{ConnectionId, ServerEvent};

use crate::signaling::rooms::RoomRegistry;

/// One connection's outbound queue sender.
#[derive(Clone)]
struct PeerHandle {
    tx: mpsc::Sender<Message>,
}

#[derive(Default)]
pub struct SignalingHub {
    peers: DashMap<ConnectionId, PeerHandle>,
    rooms: RoomRegistry,
}

impl SignalingHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection's outbound queue.
    pub fn register(&self, conn: ConnectionId, tx: mpsc::Sender<Message>) {
        self.peers.insert(conn, PeerHandle { tx });
    }

    /// Detach a connection's outbound queue. No further events can be
    /// delivered to it.
    pub fn unregister(&self, conn: &ConnectionId) {
        self.peers.remove(conn);
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Send one event to one connection.
    pub fn send_to(&self, conn: ConnectionId, event: &ServerEvent) {
        let Some(wire) = self.encode(event) else {
            return;
        };
        if let Some(peer) = self.peers.get(&conn) {
            let _ = peer.tx.try_send(Message::Text(wire));
        }
    }

    /// Deliver to every occupant of `room` except `except`.
    pub fn broadcast_to_room_except(&self, room: &str, except: ConnectionId, event: &ServerEvent) {
        self.fanout(room, Some(except), event);
    }

    /// Deliver to every occupant of `room`, including the sender.
    pub fn broadcast_to_room(&self, room: &str, event: &ServerEvent) {
        self.fanout(room, None, event);
    }

    fn fanout(&self, room: &str, except: Option<ConnectionId>, event: &ServerEvent) {
        let Some(wire) = self.encode(event) else {
            return;
        };
        for occupant in self.rooms.occupants(room) {
            if Some(occupant) == except {
                continue;
            }
            if let Some(peer) = self.peers.get(&occupant) {
                let _ = peer.tx.try_send(Message::Text(wire.clone()));
            }
        }
    }

    /// Serialize once, send N times.
    fn encode(&self, event: &ServerEvent) -> Option<String> {
        match event.to_wire() {
            Ok(wire) => Some(wire),
            Err(e) => {
                tracing::error!(event = event.event_name(), error = %e, "outbound encode failed");
                None
            }
        }
    }
}
