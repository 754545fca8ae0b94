//! Signaling wire protocol (JSON text frames).
//!
//! This module hosts the two wire contracts the gateway exposes:
//! - Signaling events: JSON envelopes carrying the named call-setup events,
//!   with relay payloads kept as `RawValue` so the relay never re-interprets
//!   their contents.
//! - ICE server descriptors returned by the credential endpoint.
//!
//! All parsers are panic-free: malformed input is reported as `PairlinkError`
//! instead of panicking, keeping the gateway resilient to hostile traffic.

pub mod event;
pub mod ice;

pub use event::{ClientEvent, ConnectionId, Envelope, ServerEvent};
pub use ice::IceServer;
