//! Delayed retries of route discovery.
//!
//! A retry re-enters user-data processing with an incremented retry count.
//! Retries are never cancelled: if a route appeared meanwhile, the retry
//! simply forwards the data.

use std::collections::BTreeMap;

use aodv_core::message::UserData;
use aodv_core::types::NodeAddress;

use crate::clock::{Clock, ManualClock};

/// A pending user-data send waiting for route discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTask {
    pub data: UserData,
    /// Neighbor the data arrived from, when it is being forwarded.
    pub previous_hop: Option<NodeAddress>,
    /// Discovery attempts already made for this data.
    pub retries: u8,
}

impl RetryTask {
    pub fn destination(&self) -> NodeAddress {
        self.data.destination()
    }
}

/// Single-shot delayed task facility.
///
/// The implementation must hand each task back to the same engine that
/// scheduled it, serialized with all other entry points.
pub trait RetryScheduler {
    fn schedule(&mut self, task: RetryTask, delay_ms: u64);
}

/// Deterministic in-memory scheduler driven by a [`ManualClock`].
///
/// Tasks due at the same time come out in scheduling order.
#[derive(Debug)]
pub struct RetryQueue {
    clock: ManualClock,
    pending: BTreeMap<(u64, u64), RetryTask>,
    next_seq: u64,
}

impl RetryQueue {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Remove the earliest task that is due at `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<RetryTask> {
        let key = *self.pending.keys().next()?;
        if key.0 > now {
            return None;
        }
        self.pending.remove(&key)
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl RetryScheduler for RetryQueue {
    fn schedule(&mut self, task: RetryTask, delay_ms: u64) {
        let due = self.clock.now_ms().saturating_add(delay_ms);
        self.pending.insert((due, self.next_seq), task);
        self.next_seq += 1;
    }
}
