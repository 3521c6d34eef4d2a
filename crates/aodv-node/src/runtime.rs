//! Adapters that let the synchronous routing engine live inside a tokio task.
//!
//! The engine's callback, scheduler and clock are all synchronous. Outbound
//! frames are queued in [`NodeCallback`] and flushed by the actor after each
//! engine call; retries become sleeping tasks that post back into the actor's
//! event channel.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::time::Instant;

use aodv_core::message::{Message, UserData};
use aodv_core::types::NodeAddress;
use aodv_routing::{Clock, RetryScheduler, RetryTask, RoutingCallback};

use crate::node::NodeEvent;

/// Something the application should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// User data addressed to this node arrived.
    Delivered(UserData),
    /// Route discovery gave up.
    Unreachable(String),
}

/// Console form: `DATA <text>` or `ERROR <reason>`.
impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Delivered(data) => {
                write!(f, "DATA {}", String::from_utf8_lossy(data.payload()))
            }
            Notification::Unreachable(reason) => write!(f, "ERROR {reason}"),
        }
    }
}

/// Routing callback that queues outbound messages for the actor to transmit.
#[derive(Debug)]
pub struct NodeCallback {
    outbox: Vec<(Message, NodeAddress)>,
    notify: mpsc::UnboundedSender<Notification>,
}

impl NodeCallback {
    pub fn new(notify: mpsc::UnboundedSender<Notification>) -> Self {
        Self {
            outbox: Vec::new(),
            notify,
        }
    }

    /// Take every message queued since the last drain, in send order.
    pub fn drain_outbox(&mut self) -> Vec<(Message, NodeAddress)> {
        std::mem::take(&mut self.outbox)
    }

    /// Whether anyone still listens for notifications.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        !self.notify.is_closed()
    }

    fn publish(&self, notification: Notification) {
        if self.notify.send(notification).is_err() {
            tracing::trace!("no notification subscriber");
        }
    }
}

impl RoutingCallback for NodeCallback {
    fn send(&mut self, message: &Message, destination: NodeAddress) {
        self.outbox.push((message.clone(), destination));
    }

    fn on_unreachable(&mut self, reason: &str) {
        tracing::info!(reason, "route discovery failed");
        self.publish(Notification::Unreachable(reason.to_string()));
    }

    fn deliver(&mut self, data: &UserData) {
        self.publish(Notification::Delivered(data.clone()));
    }
}

/// Scheduler that sleeps on the tokio timer and hands the task back to the actor.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: mpsc::Sender<NodeEvent>,
}

impl TokioScheduler {
    pub(crate) fn new(events: mpsc::Sender<NodeEvent>) -> Self {
        Self { events }
    }
}

impl RetryScheduler for TokioScheduler {
    fn schedule(&mut self, task: RetryTask, delay_ms: u64) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if events.send(NodeEvent::RetryFired(task)).await.is_err() {
                tracing::debug!("node stopped before retry fired");
            }
        });
    }
}

/// Millisecond clock driven by the tokio timer.
///
/// Anchored to wall time at construction and advanced by
/// [`tokio::time::Instant`], so paused-time tests see a consistent clock.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    anchor_ms: u64,
    start: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        let anchor_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self::anchored_at(anchor_ms)
    }

    pub fn anchored_at(anchor_ms: u64) -> Self {
        Self {
            anchor_ms,
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.anchor_ms.saturating_add(elapsed)
    }
}
