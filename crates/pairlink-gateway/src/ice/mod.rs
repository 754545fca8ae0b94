//! ICE credential collaborators.
//!
//! The gateway calls the provider once per client session, outside the room
//! protocol. A failing provider degrades to "no ICE servers available" for
//! that caller; it is never fatal to signaling.

pub mod client;

use async_trait::async_trait;

use pairlink_core::{protocol::IceServer, Result};

pub use client::TokenIceClient;

/// External token-issuing collaborator.
#[async_trait]
pub trait IceProvider: Send + Sync {
    /// Fetch relay/STUN/TURN descriptors for one client session.
    async fn fetch_ice_servers(&self) -> Result<Vec<IceServer>>;
}

/// Provider used when no credential service is configured.
#[derive(Default)]
pub struct NoIceServers;

#[async_trait]
impl IceProvider for NoIceServers {
    async fn fetch_ice_servers(&self) -> Result<Vec<IceServer>> {
        Ok(Vec::new())
    }
}
