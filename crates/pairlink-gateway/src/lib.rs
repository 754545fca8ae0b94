//! pairlink gateway library entry.
//!
//! This crate wires the transport, signaling core, and ICE credential
//! collaborators into a cohesive relay stack. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod ice;
pub mod router;
pub mod signaling;
pub mod transport;
