//! Protocol constants and enumerations for the AODV wire format.

use crate::error::PacketError;

// Wire format sizes
pub const BLOCK_SIZE: usize = 3;
pub const ROUTE_REQUEST_SIZE: usize = 3 * BLOCK_SIZE;
pub const ROUTE_REPLY_SIZE: usize = 3 * BLOCK_SIZE;
pub const USER_DATA_HEADER_SIZE: usize = BLOCK_SIZE;

// Field bounds
pub const MAX_6_BITS: u32 = (1 << 6) - 1;
pub const MAX_8_BITS: u32 = (1 << 8) - 1;
pub const MAX_16_BITS: u32 = (1 << 16) - 1;
pub const MAX_18_BITS: u32 = (1 << 18) - 1;

/// Largest hop count an RREQ can carry (6 bits).
pub const MAX_REQUEST_HOP_COUNT: u8 = MAX_6_BITS as u8;
/// Largest RREQ identifier (6 bits).
pub const MAX_REQUEST_ID: u8 = MAX_6_BITS as u8;
/// Largest RREP lifetime in milliseconds (18 bits).
pub const MAX_REPLY_LIFETIME: u32 = MAX_18_BITS;

// Block 1 bit positions
pub const TYPE_SHIFT: u32 = 18;
pub const UNKNOWN_SEQUENCE_FLAG: u32 = 1 << 17;
pub const REQUEST_HOP_COUNT_SHIFT: u32 = 6;
pub const USER_DATA_ADDRESS_SHIFT: u32 = 2;

// RFC 3561 timing defaults used by the reference deployment (milliseconds).
pub const ACTIVE_ROUTE_TIMEOUT: u64 = 3000;
pub const MY_ROUTE_TIMEOUT: u64 = 2 * ACTIVE_ROUTE_TIMEOUT;
pub const NET_DIAMETER: u64 = 35;
pub const NODE_TRAVERSAL_TIME: u64 = 40;
pub const NET_TRAVERSAL_TIME: u64 = 2 * NODE_TRAVERSAL_TIME * NET_DIAMETER; // 2800
pub const PATH_DISCOVERY_TIME: u64 = 2 * NET_TRAVERSAL_TIME;
pub const RREQ_RETRIES: u8 = 2;

/// The 6-bit type tag at the top of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    UserData = 0,
    RouteRequest = 1,
    RouteReply = 2,
}

impl MessageType {
    pub fn from_u8(v: u8) -> Result<Self, PacketError> {
        match v {
            0 => Ok(MessageType::UserData),
            1 => Ok(MessageType::RouteRequest),
            2 => Ok(MessageType::RouteReply),
            _ => Err(PacketError::UnknownMessageType(v)),
        }
    }

    /// The tag positioned in a 24-bit block.
    pub const fn block_bits(self) -> u32 {
        (self as u32) << TYPE_SHIFT
    }
}
