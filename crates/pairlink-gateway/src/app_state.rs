//! Shared application state for the pairlink gateway.
//!
//! Wires the signaling hub and the ICE credential provider; startup errors
//! are explicit (Result instead of panic).

use std::sync::Arc;

use pairlink_core::Result;

use crate::config::GatewayConfig;
use crate::ice::{IceProvider, NoIceServers, TokenIceClient};
use crate::signaling::SignalingHub;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    hub: Arc<SignalingHub>,
    ice: Arc<dyn IceProvider>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let ice: Arc<dyn IceProvider> = match &cfg.ice {
            Some(ice_cfg) => Arc::new(TokenIceClient::from_config(ice_cfg)?),
            None => Arc::new(NoIceServers),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                hub: Arc::new(SignalingHub::new()),
                ice,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn hub(&self) -> Arc<SignalingHub> {
        Arc::clone(&self.inner.hub)
    }

    pub fn ice(&self) -> Arc<dyn IceProvider> {
        Arc::clone(&self.inner.ice)
    }
}
