//! The three AODV message kinds and their bit-packed wire layouts.

pub(crate) mod block;
pub mod route_reply;
pub mod route_request;
pub mod user_data;
pub mod wire;

use core::fmt;

use crate::constants::MessageType;

pub use route_reply::RouteReply;
pub use route_request::RouteRequest;
pub use user_data::UserData;
pub use wire::{classify, decode, encode};

/// Any frame that can travel over the mesh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    UserData(UserData),
    RouteRequest(RouteRequest),
    RouteReply(RouteReply),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::UserData(_) => MessageType::UserData,
            Message::RouteRequest(_) => MessageType::RouteRequest,
            Message::RouteReply(_) => MessageType::RouteReply,
        }
    }
}

impl From<UserData> for Message {
    fn from(data: UserData) -> Self {
        Message::UserData(data)
    }
}

impl From<RouteRequest> for Message {
    fn from(request: RouteRequest) -> Self {
        Message::RouteRequest(request)
    }
}

impl From<RouteReply> for Message {
    fn from(reply: RouteReply) -> Self {
        Message::RouteReply(reply)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::UserData(m) => fmt::Display::fmt(m, f),
            Message::RouteRequest(m) => fmt::Display::fmt(m, f),
            Message::RouteReply(m) => fmt::Display::fmt(m, f),
        }
    }
}
