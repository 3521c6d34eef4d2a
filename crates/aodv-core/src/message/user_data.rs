//! User Data layout.
//!
//! The header block holds the type tag, the 16-bit destination and the top two
//! bits of the first payload byte. Every following byte is shifted left by two
//! and carries the top two bits of its successor, so the payload ends up
//! packed directly behind the destination.

use alloc::vec::Vec;
use core::fmt;

use crate::constants::{MessageType, USER_DATA_ADDRESS_SHIFT, USER_DATA_HEADER_SIZE};
use crate::error::PacketError;
use crate::message::block;
use crate::types::NodeAddress;

const CARRY_MASK: u8 = 0b11;
const CARRY_SHIFT: u32 = 6;

/// Application payload addressed to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserData {
    destination: NodeAddress,
    payload: Vec<u8>,
}

impl UserData {
    pub fn new(destination: NodeAddress, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            destination,
            payload: payload.into(),
        }
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Encoded size: the header block plus one byte per payload byte.
    pub fn encoded_len(&self) -> usize {
        USER_DATA_HEADER_SIZE + self.payload.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let lead = self.payload.first().map_or(0, |b| b >> CARRY_SHIFT);
        let header = MessageType::UserData.block_bits()
            | (u32::from(self.destination.get()) << USER_DATA_ADDRESS_SHIFT)
            | u32::from(lead);

        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&block::write(header));
        for (i, byte) in self.payload.iter().enumerate() {
            let carry = self.payload.get(i + 1).map_or(0, |next| next >> CARRY_SHIFT);
            out.push((byte << 2) | carry);
        }
        out
    }

    /// Decode a frame already classified as user data.
    pub fn decode(frame: &[u8]) -> Result<Self, PacketError> {
        if frame.len() < USER_DATA_HEADER_SIZE {
            return Err(PacketError::InvalidFrame {
                expected: USER_DATA_HEADER_SIZE,
                actual: frame.len(),
            });
        }

        let header = block::read(frame, 0);
        let destination = NodeAddress::new((header >> USER_DATA_ADDRESS_SHIFT) as u16);

        let mut carry = header as u8 & CARRY_MASK;
        let mut payload = Vec::with_capacity(frame.len() - USER_DATA_HEADER_SIZE);
        for byte in &frame[USER_DATA_HEADER_SIZE..] {
            payload.push((carry << CARRY_SHIFT) | (byte >> 2));
            carry = byte & CARRY_MASK;
        }

        Ok(Self {
            destination,
            payload,
        })
    }
}

impl fmt::Display for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DATA{{dest={} len={}}}",
            self.destination,
            self.payload.len()
        )
    }
}
