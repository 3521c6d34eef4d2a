//! Route Request (RREQ) layout.
//!
//! ```text
//! block 1: type(6) | unknown(1) | reserved(5) | hop_count(6) | request_id(6)
//! block 2: destination(16) | destination_sequence(8)
//! block 3: originator(16)  | originator_sequence(8)
//! ```

use core::fmt;

use crate::constants::{
    BLOCK_SIZE, MAX_REQUEST_HOP_COUNT, MAX_REQUEST_ID, MAX_6_BITS, MessageType,
    REQUEST_HOP_COUNT_SHIFT, ROUTE_REQUEST_SIZE, UNKNOWN_SEQUENCE_FLAG,
};
use crate::error::PacketError;
use crate::message::block;
use crate::types::NodeAddress;

/// A broadcast request for a route to `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteRequest {
    hop_count: u8,
    request_id: u8,
    destination: NodeAddress,
    destination_sequence: u8,
    destination_sequence_unknown: bool,
    originator: NodeAddress,
    originator_sequence: u8,
}

impl RouteRequest {
    /// Build a request, rejecting a hop count or request id wider than 6 bits.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hop_count: u8,
        request_id: u8,
        destination: NodeAddress,
        destination_sequence: u8,
        destination_sequence_unknown: bool,
        originator: NodeAddress,
        originator_sequence: u8,
    ) -> Result<Self, PacketError> {
        block::check_range(
            "hop_count",
            u64::from(hop_count),
            u64::from(MAX_REQUEST_HOP_COUNT),
        )?;
        block::check_range(
            "request_id",
            u64::from(request_id),
            u64::from(MAX_REQUEST_ID),
        )?;
        Ok(Self {
            hop_count,
            request_id,
            destination,
            destination_sequence,
            destination_sequence_unknown,
            originator,
            originator_sequence,
        })
    }

    pub fn hop_count(&self) -> u8 {
        self.hop_count
    }

    pub fn request_id(&self) -> u8 {
        self.request_id
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    pub fn destination_sequence(&self) -> u8 {
        self.destination_sequence
    }

    pub fn destination_sequence_unknown(&self) -> bool {
        self.destination_sequence_unknown
    }

    pub fn originator(&self) -> NodeAddress {
        self.originator
    }

    pub fn originator_sequence(&self) -> u8 {
        self.originator_sequence
    }

    /// The same request one hop further along.
    ///
    /// Fails once the hop count would leave its 6-bit field.
    pub fn with_incremented_hop_count(&self) -> Result<Self, PacketError> {
        let next = u64::from(self.hop_count) + 1;
        block::check_range("hop_count", next, u64::from(MAX_REQUEST_HOP_COUNT))?;
        Ok(Self {
            hop_count: next as u8,
            ..*self
        })
    }

    pub fn encode(&self) -> [u8; ROUTE_REQUEST_SIZE] {
        let mut first = MessageType::RouteRequest.block_bits()
            | (u32::from(self.hop_count) << REQUEST_HOP_COUNT_SHIFT)
            | u32::from(self.request_id);
        if self.destination_sequence_unknown {
            first |= UNKNOWN_SEQUENCE_FLAG;
        }

        let mut out = [0u8; ROUTE_REQUEST_SIZE];
        out[..BLOCK_SIZE].copy_from_slice(&block::write(first));
        out[BLOCK_SIZE..2 * BLOCK_SIZE].copy_from_slice(&block::write(block::pack_address(
            self.destination,
            self.destination_sequence,
        )));
        out[2 * BLOCK_SIZE..].copy_from_slice(&block::write(block::pack_address(
            self.originator,
            self.originator_sequence,
        )));
        out
    }

    /// Decode a frame already classified as a request.
    pub fn decode(frame: &[u8]) -> Result<Self, PacketError> {
        if frame.len() != ROUTE_REQUEST_SIZE {
            return Err(PacketError::InvalidFrame {
                expected: ROUTE_REQUEST_SIZE,
                actual: frame.len(),
            });
        }

        let first = block::read(frame, 0);
        let (destination, destination_sequence) =
            block::unpack_address(block::read(frame, BLOCK_SIZE));
        let (originator, originator_sequence) =
            block::unpack_address(block::read(frame, 2 * BLOCK_SIZE));

        Ok(Self {
            hop_count: ((first >> REQUEST_HOP_COUNT_SHIFT) & MAX_6_BITS) as u8,
            request_id: (first & MAX_6_BITS) as u8,
            destination,
            destination_sequence,
            destination_sequence_unknown: first & UNKNOWN_SEQUENCE_FLAG != 0,
            originator,
            originator_sequence,
        })
    }
}

impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RREQ{{hops={} id={} dest={} dseq={}{} orig={} oseq={}}}",
            self.hop_count,
            self.request_id,
            self.destination,
            self.destination_sequence,
            if self.destination_sequence_unknown { "?" } else { "" },
            self.originator,
            self.originator_sequence,
        )
    }
}
