//! The engine's view of the transport.

use aodv_core::message::{Message, UserData};
use aodv_core::types::NodeAddress;

/// Reason passed to [`RoutingCallback::on_unreachable`] when discovery gives up.
pub const DESTINATION_UNREACHABLE: &str = "Destination unreachable";

/// Outbound side of the routing engine.
///
/// Sends are fire-and-forget: the implementation encodes and transmits, and
/// handles its own failures without reporting back.
pub trait RoutingCallback {
    /// Transmit `message` to the neighbor `destination`, or to every
    /// neighbor when `destination` is [`NodeAddress::BROADCAST`].
    fn send(&mut self, message: &Message, destination: NodeAddress);

    /// Called once per data item whose route discovery was exhausted.
    fn on_unreachable(&mut self, reason: &str);

    /// Data addressed to this node.
    fn deliver(&mut self, _data: &UserData) {}
}

/// Callback that keeps everything the engine emits, for simulations and tests.
#[derive(Debug, Default)]
pub struct RecordingCallback {
    pub sent: Vec<(Message, NodeAddress)>,
    pub unreachable: Vec<String>,
    pub delivered: Vec<UserData>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything sent so far.
    pub fn take_sent(&mut self) -> Vec<(Message, NodeAddress)> {
        std::mem::take(&mut self.sent)
    }
}

impl RoutingCallback for RecordingCallback {
    fn send(&mut self, message: &Message, destination: NodeAddress) {
        self.sent.push((message.clone(), destination));
    }

    fn on_unreachable(&mut self, reason: &str) {
        self.unreachable.push(reason.to_string());
    }

    fn deliver(&mut self, data: &UserData) {
        self.delivered.push(data.clone());
    }
}
