//! Signaling core: room registry, egress hub, and per-connection sessions.
//!
//! The registry is the only shared mutable resource; every operation on it is
//! atomic per room. Sessions translate inbound events into registry mutations
//! and outbound broadcasts, and never initiate messages on their own.

pub mod hub;
pub mod rooms;
pub mod session;

pub use hub::SignalingHub;
pub use rooms::{JoinOutcome, RoomRegistry};
pub use session::SignalingSession;
