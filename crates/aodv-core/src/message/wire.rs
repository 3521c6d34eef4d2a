//! Frame-level encode, decode and classification.

use alloc::vec::Vec;

use crate::constants::{MessageType, TYPE_SHIFT};
use crate::error::PacketError;
use crate::message::{Message, RouteReply, RouteRequest, UserData};

const TAG_SHIFT_IN_FIRST_BYTE: u32 = TYPE_SHIFT - 16;

/// Identify a frame from its leading 6-bit tag without decoding the rest.
pub fn classify(frame: &[u8]) -> Result<MessageType, PacketError> {
    let first = frame.first().ok_or(PacketError::InvalidFrame {
        expected: 1,
        actual: 0,
    })?;
    MessageType::from_u8(first >> TAG_SHIFT_IN_FIRST_BYTE)
}

pub fn encode(message: &Message) -> Vec<u8> {
    match message {
        Message::UserData(data) => data.encode(),
        Message::RouteRequest(request) => request.encode().to_vec(),
        Message::RouteReply(reply) => reply.encode().to_vec(),
    }
}

pub fn decode(frame: &[u8]) -> Result<Message, PacketError> {
    match classify(frame)? {
        MessageType::UserData => UserData::decode(frame).map(Message::UserData),
        MessageType::RouteRequest => RouteRequest::decode(frame).map(Message::RouteRequest),
        MessageType::RouteReply => RouteReply::decode(frame).map(Message::RouteReply),
    }
}
