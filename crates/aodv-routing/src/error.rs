//! Routing engine error types.

use aodv_core::error::PacketError;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("node address has not been set")]
    AddressNotSet,

    #[error("packet error: {0}")]
    Packet(#[from] PacketError),
}
