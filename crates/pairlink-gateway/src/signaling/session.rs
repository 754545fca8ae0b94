//! Per-connection signaling session.
//!
//! Owns exactly one connection's protocol state and reacts to inbound events,
//! producing outbound events through the hub's egress primitives. The state
//! machine per connection is `Unjoined -> Joined(room) -> Unjoined`; the
//! current-room reference lives in the registry, so a forced removal caused
//! by a peer's `call-rejected` is immediately visible here and a fresh
//! `create-or-join` starts clean.
//!
//! Handling is fully synchronous: registry mutations are atomic per room and
//! every relay is a fire-and-forget send, so no inbound event from the same
//! connection can overlap another.

use std::sync::Arc;

use serde_json::value::RawValue;

use pairlink_core::protocol::{ClientEvent, ConnectionId, ServerEvent};

use crate::signaling::hub::SignalingHub;
use crate::signaling::rooms::JoinOutcome;

pub struct SignalingSession {
    id: ConnectionId,
    hub: Arc<SignalingHub>,
}

impl SignalingSession {
    pub fn new(id: ConnectionId, hub: Arc<SignalingHub>) -> Self {
        Self { id, hub }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Handle one inbound event.
    ///
    /// Events referencing a room the connection never joined, or sent while
    /// unjoined, are silently ignored: a malformed or late client message
    /// must not destabilize the room for the other occupant.
    pub fn handle(&self, event: ClientEvent) {
        match event {
            ClientEvent::CreateOrJoin { room } => self.on_create_or_join(room),
            ClientEvent::Message { room, payload } => self.on_message(room, payload),
            ClientEvent::CallInitiated { room, name } => self.on_call_initiated(room, name),
            ClientEvent::CallAccepted { room, name } => self.on_call_accepted(room, name),
            ClientEvent::CallRejected { room } => self.on_call_rejected(room),
            ClientEvent::LeaveRoom { room } => self.on_leave_room(room),
        }
    }

    /// Transport-level disconnect: same cleanup path as an explicit leave,
    /// so there is one source of truth for room-emptying behavior.
    pub fn disconnect(&self) {
        if let Some(room) = self.hub.rooms().room_of(&self.id) {
            self.hub.rooms().leave(&room, self.id);
            tracing::info!(conn = %self.id, %room, "left room on disconnect");
        }
    }

    fn on_create_or_join(&self, room: String) {
        if room.is_empty() {
            tracing::debug!(conn = %self.id, "create-or-join with empty room name ignored");
            return;
        }
        if let Some(current) = self.hub.rooms().room_of(&self.id) {
            tracing::debug!(conn = %self.id, %current, "create-or-join while already joined ignored");
            return;
        }

        match self.hub.rooms().try_join(&room, self.id) {
            JoinOutcome::Created => {
                tracing::info!(conn = %self.id, %room, "room created");
                self.hub.send_to(
                    self.id,
                    &ServerEvent::Created {
                        room,
                        connection: self.id,
                    },
                );
            }
            JoinOutcome::JoinedAsSecond(peer) => {
                tracing::info!(conn = %self.id, %room, %peer, "joined room");
                self.hub
                    .send_to(peer, &ServerEvent::Join { room: room.clone() });
                self.hub.send_to(
                    self.id,
                    &ServerEvent::Joined {
                        room: room.clone(),
                        connection: self.id,
                    },
                );
                // Both peers are present; synchronize the offer/answer start.
                self.hub.broadcast_to_room(&room, &ServerEvent::Ready);
            }
            JoinOutcome::Full => {
                tracing::debug!(conn = %self.id, %room, "room full");
                self.hub.send_to(self.id, &ServerEvent::Full { room });
            }
        }
    }

    fn on_message(&self, room: String, payload: Box<RawValue>) {
        if !self.is_member_of(&room) {
            return;
        }
        self.hub.broadcast_to_room_except(
            &room,
            self.id,
            &ServerEvent::Message {
                room: room.clone(),
                payload,
            },
        );
    }

    fn on_call_initiated(&self, room: String, name: String) {
        if !self.is_member_of(&room) {
            return;
        }
        let event = ServerEvent::CallInitiated {
            room: room.clone(),
            name,
        };
        self.hub.broadcast_to_room_except(&room, self.id, &event);
    }

    fn on_call_accepted(&self, room: String, name: String) {
        if !self.is_member_of(&room) {
            return;
        }
        let event = ServerEvent::CallAccepted {
            room: room.clone(),
            name,
        };
        self.hub.broadcast_to_room_except(&room, self.id, &event);
    }

    fn on_call_rejected(&self, room: String) {
        if !self.is_member_of(&room) {
            return;
        }
        self.hub.broadcast_to_room_except(
            &room,
            self.id,
            &ServerEvent::CallRejected { room: room.clone() },
        );
        // Force the peer out of the room; the rejecter's own membership stays
        // intact.
        for occupant in self.hub.rooms().occupants(&room) {
            if occupant != self.id {
                self.hub.rooms().leave(&room, occupant);
                tracing::info!(conn = %self.id, %room, peer = %occupant, "peer removed after call rejection");
            }
        }
    }

    fn on_leave_room(&self, room: String) {
        if !self.is_member_of(&room) {
            return;
        }
        self.hub.rooms().leave(&room, self.id);
        tracing::info!(conn = %self.id, %room, "left room");
    }

    fn is_member_of(&self, room: &str) -> bool {
        match self.hub.rooms().room_of(&self.id) {
            Some(current) if current == room => true,
            _ => {
                tracing::debug!(conn = %self.id, %room, "event for a room the connection is not in; ignored");
                false
            }
        }
    }
}
