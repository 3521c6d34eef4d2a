//! Async runtime for an AODV mesh node.
//!
//! Wraps the routing engine from `aodv-routing` in a tokio actor, connects it
//! to a [`Medium`] and provides configuration and logging for the
//! `aodv-node` binary.

pub mod command;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod medium;
pub mod node;
pub mod runtime;

pub use config::NodeConfig;
pub use error::NodeError;
pub use medium::{Datagram, LineMedium, MemoryHub, MemoryMedium, Medium, UdpMedium};
pub use node::{Node, NodeHandle, NodeRouter};
pub use runtime::{Notification, TokioClock};
