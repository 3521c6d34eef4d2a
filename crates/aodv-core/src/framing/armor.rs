//! Base64 armor for radio modems that accept frames as AT-command text.
//!
//! Frames are carried with the standard padded alphabet. Surrounding
//! whitespace (line endings from the serial port) is ignored on the way in.

use alloc::string::String;
use alloc::vec::Vec;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::FramingError;

/// Render a wire frame as base64 text.
pub fn armor(frame: &[u8]) -> String {
    BASE64.encode(frame)
}

/// Recover a wire frame from base64 text.
pub fn unarmor(text: &str) -> Result<Vec<u8>, FramingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FramingError::Empty);
    }
    BASE64
        .decode(trimmed)
        .map_err(|_| FramingError::InvalidBase64)
}
