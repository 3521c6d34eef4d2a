//! A single route table entry.

use std::collections::BTreeSet;

use aodv_core::types::NodeAddress;

/// Everything a node knows about reaching one destination.
///
/// Entries are never removed. An entry whose `lifetime` has passed is simply
/// inactive until a newer reply or request refreshes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    destination: NodeAddress,
    /// Last known sequence number of the destination.
    pub destination_sequence: u8,
    /// Whether `destination_sequence` came from the destination's own messages.
    pub sequence_valid: bool,
    pub hop_count: u8,
    pub next_hop: NodeAddress,
    /// Absolute expiry time in milliseconds.
    pub lifetime: u64,
    precursors: BTreeSet<NodeAddress>,
}

impl RouteEntry {
    /// A zeroed, inactive entry with an unknown sequence number.
    pub fn new(destination: NodeAddress) -> Self {
        Self {
            destination,
            destination_sequence: 0,
            sequence_valid: false,
            hop_count: 0,
            next_hop: NodeAddress::default(),
            lifetime: 0,
            precursors: BTreeSet::new(),
        }
    }

    pub fn destination(&self) -> NodeAddress {
        self.destination
    }

    /// Uses strict `>`: a route expiring exactly at `now` is inactive.
    #[must_use]
    pub fn is_active(&self, now: u64) -> bool {
        self.lifetime > now
    }

    /// Raise the lifetime to `until` unless it already lasts longer.
    pub fn extend_lifetime(&mut self, until: u64) {
        self.lifetime = self.lifetime.max(until);
    }

    /// Remaining lifetime at `now`, zero once expired.
    #[must_use]
    pub fn remaining(&self, now: u64) -> u64 {
        self.lifetime.saturating_sub(now)
    }

    /// Record a neighbor that forwards traffic over this route.
    pub fn add_precursor(&mut self, neighbor: NodeAddress) {
        self.precursors.insert(neighbor);
    }

    pub fn precursors(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        self.precursors.iter().copied()
    }

    #[must_use]
    pub fn has_precursor(&self, neighbor: NodeAddress) -> bool {
        self.precursors.contains(&neighbor)
    }
}
