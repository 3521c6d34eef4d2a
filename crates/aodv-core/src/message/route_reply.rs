//! Route Reply (RREP) layout.
//!
//! ```text
//! block 1: type(6) | lifetime(18)
//! block 2: destination(16) | destination_sequence(8)
//! block 3: originator(16)  | hop_count(8)
//! ```

use core::fmt;

use crate::constants::{
    BLOCK_SIZE, MAX_18_BITS, MAX_8_BITS, MAX_REPLY_LIFETIME, MessageType, ROUTE_REPLY_SIZE,
};
use crate::error::PacketError;
use crate::message::block;
use crate::types::NodeAddress;

/// A unicast reply carrying a route to `destination` back to `originator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteReply {
    lifetime: u32,
    destination: NodeAddress,
    destination_sequence: u8,
    originator: NodeAddress,
    hop_count: u8,
}

impl RouteReply {
    /// Build a reply; `lifetime` is in milliseconds and must fit 18 bits.
    pub fn new(
        lifetime: u32,
        destination: NodeAddress,
        destination_sequence: u8,
        originator: NodeAddress,
        hop_count: u8,
    ) -> Result<Self, PacketError> {
        block::check_range(
            "lifetime",
            u64::from(lifetime),
            u64::from(MAX_REPLY_LIFETIME),
        )?;
        Ok(Self {
            lifetime,
            destination,
            destination_sequence,
            originator,
            hop_count,
        })
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    pub fn destination_sequence(&self) -> u8 {
        self.destination_sequence
    }

    pub fn originator(&self) -> NodeAddress {
        self.originator
    }

    pub fn hop_count(&self) -> u8 {
        self.hop_count
    }

    pub fn with_incremented_hop_count(&self) -> Result<Self, PacketError> {
        let next = u64::from(self.hop_count) + 1;
        block::check_range("hop_count", next, u64::from(MAX_8_BITS))?;
        Ok(Self {
            hop_count: next as u8,
            ..*self
        })
    }

    pub fn encode(&self) -> [u8; ROUTE_REPLY_SIZE] {
        let first = MessageType::RouteReply.block_bits() | self.lifetime;

        let mut out = [0u8; ROUTE_REPLY_SIZE];
        out[..BLOCK_SIZE].copy_from_slice(&block::write(first));
        out[BLOCK_SIZE..2 * BLOCK_SIZE].copy_from_slice(&block::write(block::pack_address(
            self.destination,
            self.destination_sequence,
        )));
        out[2 * BLOCK_SIZE..].copy_from_slice(&block::write(block::pack_address(
            self.originator,
            self.hop_count,
        )));
        out
    }

    /// Decode a frame already classified as a reply.
    pub fn decode(frame: &[u8]) -> Result<Self, PacketError> {
        if frame.len() != ROUTE_REPLY_SIZE {
            return Err(PacketError::InvalidFrame {
                expected: ROUTE_REPLY_SIZE,
                actual: frame.len(),
            });
        }

        let first = block::read(frame, 0);
        let (destination, destination_sequence) =
            block::unpack_address(block::read(frame, BLOCK_SIZE));
        let (originator, hop_count) = block::unpack_address(block::read(frame, 2 * BLOCK_SIZE));

        Ok(Self {
            lifetime: first & MAX_18_BITS,
            destination,
            destination_sequence,
            originator,
            hop_count,
        })
    }
}

impl fmt::Display for RouteReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RREP{{life={} dest={} dseq={} orig={} hops={}}}",
            self.lifetime,
            self.destination,
            self.destination_sequence,
            self.originator,
            self.hop_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination_reply() -> RouteReply {
        RouteReply::new(6000, NodeAddress::new(2), 1, NodeAddress::new(1), 0).unwrap()
    }

    #[test]
    fn test_encode_vector() {
        assert_eq!(
            hex::encode(destination_reply().encode()),
            "081770000201000100"
        );
    }

    #[test]
    fn test_decode_vector() {
        let frame = hex::decode("0bffffabcdfe1234ff").unwrap();
        let reply = RouteReply::decode(&frame).unwrap();
        assert_eq!(reply.lifetime(), MAX_REPLY_LIFETIME);
        assert_eq!(reply.destination(), NodeAddress::new(0xABCD));
        assert_eq!(reply.destination_sequence(), 0xFE);
        assert_eq!(reply.originator(), NodeAddress::new(0x1234));
        assert_eq!(reply.hop_count(), 0xFF);
    }

    #[test]
    fn test_lifetime_bounds() {
        let dest = NodeAddress::new(2);
        let orig = NodeAddress::new(1);
        assert!(RouteReply::new(MAX_REPLY_LIFETIME, dest, 0, orig, 0).is_ok());
        assert_eq!(
            RouteReply::new(MAX_REPLY_LIFETIME + 1, dest, 0, orig, 0),
            Err(PacketError::FieldOutOfRange {
                field: "lifetime",
                value: 262_144,
                max: 262_143
            })
        );
    }

    #[test]
    fn test_increment_hop_count() {
        let reply = destination_reply().with_incremented_hop_count().unwrap();
        assert_eq!(reply.hop_count(), 1);
        assert_eq!(reply.lifetime(), 6000);

        let edge = RouteReply::new(0, NodeAddress::new(2), 0, NodeAddress::new(1), 255).unwrap();
        assert!(matches!(
            edge.with_incremented_hop_count(),
            Err(PacketError::FieldOutOfRange { value: 256, .. })
        ));
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(
            RouteReply::decode(&[]),
            Err(PacketError::InvalidFrame {
                expected: 9,
                actual: 0
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            destination_reply().to_string(),
            "RREP{life=6000 dest=0002 dseq=1 orig=0001 hops=0}"
        );
    }
}
