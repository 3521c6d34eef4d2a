//! Newtype wrappers for protocol address fields.
//!
//! Addresses are plain 16-bit values on the wire; wrapping them keeps node
//! addresses from being mixed up with sequence numbers and hop counts, which
//! share the same integer widths.

use core::fmt;
use core::str::FromStr;

/// A 16-bit mesh node address.
///
/// `0xFFFF` is reserved for broadcast.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct NodeAddress(u16);

impl NodeAddress {
    /// The reserved broadcast address.
    pub const BROADCAST: NodeAddress = NodeAddress(0xFFFF);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw 16-bit value.
    pub const fn get(self) -> u16 {
        self.0
    }

    pub const fn is_broadcast(self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl From<u16> for NodeAddress {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<NodeAddress> for u16 {
    fn from(addr: NodeAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeAddress({:04X})", self.0)
    }
}

/// Parses the 1–4 digit hex form used by modem configuration (`"00A1"`),
/// with an optional `0x` prefix.
impl FromStr for NodeAddress {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 4 {
            return Err(InvalidAddress);
        }
        u16::from_str_radix(digits, 16)
            .map(NodeAddress)
            .map_err(|_| InvalidAddress)
    }
}

/// Error returned when a string is not a 16-bit hex address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddress;

impl fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid node address: expected 1-4 hex digits")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidAddress {}
