//! ICE server descriptors.
//!
//! Returned by the credential endpoint so clients can configure their peer
//! connection for NAT traversal. The gateway never interprets these beyond
//! passing them through.

use serde::{Deserialize, Serialize};

/// One STUN/TURN relay descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    /// Server URIs (e.g., `stun:...`, `turn:...`).
    pub urls: Vec<String>,
    /// TURN username, when the server requires credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// TURN credential, paired with `username`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// Credential-free descriptor (STUN).
    pub fn urls_only(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }
}
