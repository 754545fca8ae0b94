//! Top-level facade crate for pairlink.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use pairlink_core::*;
}

pub mod gateway {
    pub use pairlink_gateway::*;
}
