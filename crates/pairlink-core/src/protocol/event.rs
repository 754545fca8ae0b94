//! Signaling event envelopes (JSON).
//!
//! Inbound frames parse into [`Envelope`] once, then narrow into the closed
//! [`ClientEvent`] set so session handlers dispatch over a plain `match`
//! instead of per-name callback wiring. Relay payloads are stored as
//! `RawValue` end to end: the relay forwards them verbatim and never parses
//! their contents.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::error::{PairlinkError, Result};

/// Opaque identifier for one bidirectional message channel.
///
/// Stable for the channel's lifetime; ownership of the channel itself belongs
/// to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh identifier for a newly accepted channel.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Inbound envelope (Text frame).
///
/// Unknown extra fields are tolerated; a late or malformed client message
/// must not destabilize the room for the other occupant.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Event name (e.g., "create-or-join").
    pub event: String,
    /// Room name, required by every inbound event.
    #[serde(default)]
    pub room: Option<String>,
    /// Display name for `call-initiated` / `call-accepted`.
    #[serde(default)]
    pub name: Option<String>,
    /// Relay payload, stored as raw JSON (never re-parsed here).
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

/// Closed set of inbound events.
#[derive(Debug)]
pub enum ClientEvent {
    CreateOrJoin { room: String },
    Message { room: String, payload: Box<RawValue> },
    CallInitiated { room: String, name: String },
    CallAccepted { room: String, name: String },
    CallRejected { room: String },
    LeaveRoom { room: String },
}

fn require<T>(v: Option<T>, event: &str, field: &str) -> Result<T> {
    v.ok_or_else(|| PairlinkError::BadRequest(format!("{event} requires {field}")))
}

impl ClientEvent {
    /// Parse a raw text frame into a typed event.
    pub fn parse(s: &str) -> Result<Self> {
        let env: Envelope = serde_json::from_str(s)
            .map_err(|e| PairlinkError::BadRequest(format!("invalid envelope json: {e}")))?;
        Self::from_envelope(env)
    }

    /// Narrow a parsed envelope into the closed event set.
    pub fn from_envelope(env: Envelope) -> Result<Self> {
        let Envelope {
            event,
            room,
            name,
            payload,
        } = env;
        match event.as_str() {
            "create-or-join" => Ok(ClientEvent::CreateOrJoin {
                room: require(room, &event, "room")?,
            }),
            "message" => Ok(ClientEvent::Message {
                room: require(room, &event, "room")?,
                payload: require(payload, &event, "payload")?,
            }),
            "call-initiated" => Ok(ClientEvent::CallInitiated {
                room: require(room, &event, "room")?,
                name: require(name, &event, "name")?,
            }),
            "call-accepted" => Ok(ClientEvent::CallAccepted {
                room: require(room, &event, "room")?,
                name: require(name, &event, "name")?,
            }),
            "call-rejected" => Ok(ClientEvent::CallRejected {
                room: require(room, &event, "room")?,
            }),
            "leave-room" => Ok(ClientEvent::LeaveRoom {
                room: require(room, &event, "room")?,
            }),
            other => Err(PairlinkError::BadRequest(format!("unknown event: {other}"))),
        }
    }

}

/// Outbound events emitted by the signaling session.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    Created { room: String, connection: ConnectionId },
    Join { room: String },
    Joined { room: String, connection: ConnectionId },
    Ready,
    Full { room: String },
    Message { room: String, payload: Box<RawValue> },
    CallInitiated { room: String, name: String },
    CallAccepted { room: String, name: String },
    CallRejected { room: String },
}

/// Outbound wire shape, mirroring the inbound envelope.
#[derive(Serialize)]
struct OutboundEnvelope<'a> {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection: Option<ConnectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a RawValue>,
}

impl ServerEvent {
    /// Wire name of this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::Created { .. } => "created",
            ServerEvent::Join { .. } => "join",
            ServerEvent::Joined { .. } => "joined",
            ServerEvent::Ready => "ready",
            ServerEvent::Full { .. } => "full",
            ServerEvent::Message { .. } => "message",
            ServerEvent::CallInitiated { .. } => "call-initiated",
            ServerEvent::CallAccepted { .. } => "call-accepted",
            ServerEvent::CallRejected { .. } => "call-rejected",
        }
    }

    /// Serialize to the wire envelope (serialize once, send N times).
    pub fn to_wire(&self) -> Result<String> {
        let env = match self {
            ServerEvent::Created { room, connection } => OutboundEnvelope {
                event: self.event_name(),
                room: Some(room),
                connection: Some(*connection),
                name: None,
                payload: None,
            },
            ServerEvent::Join { room } | ServerEvent::Full { room } | ServerEvent::CallRejected { room } => {
                OutboundEnvelope {
                    event: self.event_name(),
                    room: Some(room),
                    connection: None,
                    name: None,
                    payload: None,
                }
            }
            ServerEvent::Joined { room, connection } => OutboundEnvelope {
                event: self.event_name(),
                room: Some(room),
                connection: Some(*connection),
                name: None,
                payload: None,
            },
            ServerEvent::Ready => OutboundEnvelope {
                event: self.event_name(),
                room: None,
                connection: None,
                name: None,
                payload: None,
            },
            ServerEvent::Message { room, payload } => OutboundEnvelope {
                event: self.event_name(),
                room: Some(room),
                connection: None,
                name: None,
                payload: Some(payload),
            },
            ServerEvent::CallInitiated { room, name } | ServerEvent::CallAccepted { room, name } => {
                OutboundEnvelope {
                    event: self.event_name(),
                    room: Some(room),
                    connection: None,
                    name: Some(name),
                    payload: None,
                }
            }
        };
        serde_json::to_string(&env)
            .map_err(|e| PairlinkError::Internal(format!("event encode failed: {e}")))
    }
}
