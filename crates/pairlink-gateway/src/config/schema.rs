use serde::Deserialize;

use pairlink_core::error::{PairlinkError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Optional ICE credential endpoint; absent means "no ICE servers".
    #[serde(default)]
    pub ice: Option<IceConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PairlinkError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        if let Some(ice) = &self.ice {
            ice.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(PairlinkError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(PairlinkError::BadRequest(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(PairlinkError::BadRequest(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IceConfig {
    /// Token endpoint of the credential service.
    pub token_url: String,

    #[serde(default = "default_ice_timeout_ms")]
    pub timeout_ms: u64,
}

impl IceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_url.is_empty() {
            return Err(PairlinkError::BadRequest(
                "ice.token_url must not be empty".into(),
            ));
        }
        if !(500..=30000).contains(&self.timeout_ms) {
            return Err(PairlinkError::BadRequest(
                "ice.timeout_ms must be between 500 and 30000".into(),
            ));
        }
        Ok(())
    }
}

fn default_ice_timeout_ms() -> u64 {
    5000
}
