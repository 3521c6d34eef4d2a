//! Duplicate route request suppression.
//!
//! Requests are identified by their 6-bit id together with the originator.
//! Only the most recent originator per id is remembered; the id space is
//! small enough that the record never needs pruning.

use std::collections::HashMap;

use aodv_core::types::NodeAddress;

/// Last originator seen for each request id.
#[derive(Debug, Default)]
pub struct RecentRequests {
    by_id: HashMap<u8, NodeAddress>,
}

impl RecentRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `(request_id, originator)` is the most recently recorded pair.
    #[must_use]
    pub fn contains(&self, request_id: u8, originator: NodeAddress) -> bool {
        self.by_id.get(&request_id) == Some(&originator)
    }

    /// Record a request and return `true` if it was new (not a duplicate).
    pub fn observe(&mut self, request_id: u8, originator: NodeAddress) -> bool {
        self.by_id.insert(request_id, originator) != Some(originator)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: NodeAddress = NodeAddress::new(0x0A);
    const B: NodeAddress = NodeAddress::new(0x0B);

    #[test]
    fn test_first_observation_is_new() {
        let mut recent = RecentRequests::new();
        assert!(recent.is_empty());
        assert!(recent.observe(1, A));
        assert!(recent.contains(1, A));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_same_pair_is_duplicate() {
        let mut recent = RecentRequests::new();
        assert!(recent.observe(1, A));
        assert!(!recent.observe(1, A));
    }

    #[test]
    fn test_same_id_other_originator_is_new() {
        let mut recent = RecentRequests::new();
        assert!(recent.observe(1, A));
        assert!(recent.observe(1, B));
        // B overwrote A, so A looks new again.
        assert!(!recent.contains(1, A));
        assert!(recent.observe(1, A));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_ids_tracked_independently() {
        let mut recent = RecentRequests::new();
        assert!(recent.observe(1, A));
        assert!(recent.observe(2, A));
        assert!(!recent.observe(1, A));
        assert_eq!(recent.len(), 2);
    }
}
