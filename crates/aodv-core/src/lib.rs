//! Core types, constants, and wire formats for the AODV mesh routing stack.
//!
//! This crate defines node addressing, the three bit-packed message layouts
//! (user data, route request, route reply), and the text armor used by
//! modem-style transports.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod framing;
pub mod message;
pub mod types;

pub use constants::MessageType;
pub use error::{FramingError, PacketError};
pub use message::{Message, RouteReply, RouteRequest, UserData, classify, decode, encode};
pub use types::{InvalidAddress, NodeAddress};
