//! Decode-once codec for the transport layer.
//!
//! - Text frames => the closed `ClientEvent` set
//! - Ping/Pong/Close are surfaced for lifecycle management
//! - Binary frames carry no meaning in this protocol and are rejected
//!
//! All parsing is panic-free: malformed input is reported as `PairlinkError`.

use axum::extract::ws::Message;

use pairlink_core::{
    error::{PairlinkError, Result},
    protocol::ClientEvent,
};

#[derive(Debug)]
pub enum Inbound {
    Event(ClientEvent),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Event(ClientEvent::parse(&s)?)),
        Message::Binary(_) => Err(PairlinkError::BadRequest(
            "binary frames are not part of the signaling protocol".into(),
        )),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
