//! The shared broadcast channel a node transmits on.
//!
//! A medium carries opaque frames between node addresses. It does not know
//! about AODV; addressing here is the link-layer `(source, destination)` pair
//! the radio would attach, and `destination` may be
//! [`NodeAddress::BROADCAST`].

pub mod line;
pub mod memory;
pub mod udp;

use aodv_core::types::NodeAddress;

use crate::error::NodeError;

pub use line::LineMedium;
pub use memory::{MemoryHub, MemoryMedium};
pub use udp::UdpMedium;

/// Largest frame any medium carries. Larger frames are refused on transmit.
pub const MAX_FRAME_SIZE: usize = 1024;

/// Refuse frames a medium could not deliver intact.
pub fn check_frame_size(frame: &[u8]) -> Result<(), NodeError> {
    if frame.len() > MAX_FRAME_SIZE {
        return Err(NodeError::FrameTooLarge {
            size: frame.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(())
}

/// One frame as heard on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub source: NodeAddress,
    pub destination: NodeAddress,
    pub frame: Vec<u8>,
}

impl Datagram {
    /// Whether a node at `local` should process this frame.
    #[must_use]
    pub fn is_for(&self, local: NodeAddress) -> bool {
        self.destination == local || self.destination.is_broadcast()
    }
}

/// Async transport implemented by every medium.
pub trait Medium: Send + Sync + 'static {
    /// Put `frame` on the channel, tagged with the link-layer addresses.
    fn transmit(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        frame: &[u8],
    ) -> impl Future<Output = Result<(), NodeError>> + Send;

    /// Wait for the next frame heard on the channel.
    fn receive(&self) -> impl Future<Output = Result<Datagram, NodeError>> + Send;
}
