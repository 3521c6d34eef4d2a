//! Error types for the node runtime.

use aodv_core::{FramingError, PacketError};
use aodv_routing::RouterError;

/// Errors that can occur while configuring or running a node.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("router error: {0}")]
    Router(#[from] RouterError),
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),
    #[error("frame of {size} bytes exceeds the {max}-byte medium limit")]
    FrameTooLarge { size: usize, max: usize },
    #[error("medium error: {0}")]
    Medium(String),
    #[error("node stopped")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_error_is_wrapped() {
        let err: NodeError = RouterError::AddressNotSet.into();
        assert!(matches!(err, NodeError::Router(RouterError::AddressNotSet)));
        assert!(err.to_string().starts_with("router error:"));
    }

    #[test]
    fn test_packet_error_is_wrapped() {
        let err: NodeError = PacketError::UnknownMessageType(5).into();
        assert!(matches!(err, NodeError::Packet(PacketError::UnknownMessageType(5))));
    }

    #[test]
    fn test_frame_too_large_message() {
        let err = NodeError::FrameTooLarge {
            size: 1103,
            max: 1024,
        };
        assert_eq!(
            err.to_string(),
            "frame of 1103 bytes exceeds the 1024-byte medium limit"
        );
    }

    #[test]
    fn test_config_message() {
        let err = NodeError::Config("bad address".into());
        assert_eq!(err.to_string(), "configuration error: bad address");
    }
}
