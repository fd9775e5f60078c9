//! WebSocket-upgrade capability.
//!
//! # Responsibilities
//! - Detect whether the exchange is a WebSocket upgrade request
//! - Complete the upgrade handshake and surface the switched byte stream
//!
//! # Design Decisions
//! - Framing is the provider's concern; this contract ends at the raw
//!   upgraded stream
//! - No default provider: absence means the host cannot upgrade, and
//!   consumers observe that as an unresolved capability

use std::io;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};

/// Raw byte stream after a successful protocol switch.
pub trait UpgradedIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> UpgradedIo for T {}

/// Options for accepting an upgrade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcceptOptions {
    /// Subprotocol to select in the handshake response, if any.
    pub subprotocol: Option<String>,
}

/// WebSocket-upgrade capability.
#[async_trait]
pub trait WebSocketUpgrade: Send + Sync {
    /// True if the current exchange carries a WebSocket upgrade request.
    fn is_upgrade_request(&self) -> bool;

    /// Complete the handshake and return the switched byte stream.
    async fn accept(&self, options: AcceptOptions) -> io::Result<Box<dyn UpgradedIo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LoopbackUpgrade;

    #[async_trait]
    impl WebSocketUpgrade for LoopbackUpgrade {
        fn is_upgrade_request(&self) -> bool {
            true
        }

        async fn accept(&self, _options: AcceptOptions) -> io::Result<Box<dyn UpgradedIo>> {
            let (near, _far) = tokio::io::duplex(16);
            Ok(Box::new(near))
        }
    }

    #[tokio::test]
    async fn test_contract_is_object_safe_and_accepts() {
        let upgrade: Box<dyn WebSocketUpgrade> = Box::new(LoopbackUpgrade);
        assert!(upgrade.is_upgrade_request());
        assert!(upgrade.accept(AcceptOptions::default()).await.is_ok());
    }

    #[test]
    fn test_accept_options_default() {
        assert!(AcceptOptions::default().subprotocol.is_none());
    }
}
