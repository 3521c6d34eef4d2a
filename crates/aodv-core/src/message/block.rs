//! 24-bit block helpers shared by the message layouts.

use crate::constants::BLOCK_SIZE;
use crate::error::PacketError;
use crate::types::NodeAddress;

/// Read the big-endian 24-bit block starting at `offset`.
///
/// Callers validate the frame length before reading.
pub(crate) fn read(frame: &[u8], offset: usize) -> u32 {
    (u32::from(frame[offset]) << 16)
        | (u32::from(frame[offset + 1]) << 8)
        | u32::from(frame[offset + 2])
}

/// Write the low 24 bits of `value` big-endian.
pub(crate) fn write(value: u32) -> [u8; BLOCK_SIZE] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// An address in the top 16 bits and an 8-bit field below it.
pub(crate) fn pack_address(address: NodeAddress, low: u8) -> u32 {
    (u32::from(address.get()) << 8) | u32::from(low)
}

pub(crate) fn unpack_address(block: u32) -> (NodeAddress, u8) {
    (NodeAddress::new((block >> 8) as u16), block as u8)
}

/// Reject `value` if it exceeds `max`.
pub(crate) fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), PacketError> {
    if value > max {
        return Err(PacketError::FieldOutOfRange { field, value, max });
    }
    Ok(())
}
