//! Error types for the aodv-core crate.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// A field value does not fit its declared bit width.
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
    /// A frame has the wrong length for its type. For user data, `expected`
    /// is the minimum header length.
    InvalidFrame { expected: usize, actual: usize },
    UnknownMessageType(u8),
}

impl PacketError {
    /// Whether the error describes an undecodable inbound frame rather than a
    /// construction failure.
    pub fn is_malformed_frame(&self) -> bool {
        !matches!(self, PacketError::FieldOutOfRange { .. })
    }
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::FieldOutOfRange { field, value, max } => {
                write!(f, "field {field} out of range: {value} exceeds maximum {max}")
            }
            PacketError::InvalidFrame { expected, actual } => {
                write!(f, "invalid frame: expected {expected} bytes, got {actual}")
            }
            PacketError::UnknownMessageType(v) => write!(f, "unknown message type: {v}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    InvalidBase64,
    Empty,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::InvalidBase64 => write!(f, "invalid base64 armor"),
            FramingError::Empty => write!(f, "empty armored frame"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FramingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_packet_error_display() {
        let err = PacketError::FieldOutOfRange {
            field: "hop_count",
            value: 64,
            max: 63,
        };
        assert_eq!(
            err.to_string(),
            "field hop_count out of range: 64 exceeds maximum 63"
        );

        let err = PacketError::InvalidFrame {
            expected: 9,
            actual: 8,
        };
        assert_eq!(err.to_string(), "invalid frame: expected 9 bytes, got 8");

        let err = PacketError::UnknownMessageType(7);
        assert_eq!(err.to_string(), "unknown message type: 7");
    }

    #[test]
    fn test_malformed_frame_classification() {
        assert!(PacketError::InvalidFrame { expected: 9, actual: 0 }.is_malformed_frame());
        assert!(PacketError::UnknownMessageType(5).is_malformed_frame());
        assert!(
            !PacketError::FieldOutOfRange {
                field: "request_id",
                value: 64,
                max: 63
            }
            .is_malformed_frame()
        );
    }

    #[test]
    fn test_framing_error_display() {
        assert_eq!(FramingError::InvalidBase64.to_string(), "invalid base64 armor");
    }
}
