//! Pure functions for route table update decisions.
//!
//! Higher sequence numbers always win. An equal sequence number only wins
//! over a route that has expired or is longer, which keeps stale replies
//! from creating loops.

use crate::route::RouteEntry;

/// The outcome of comparing a candidate route against the existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteUpdateDecision {
    /// Existing sequence number is unknown, so anything is better.
    UnknownSequence,
    /// Candidate carries a strictly newer sequence number.
    FresherSequence,
    /// Same sequence number and the existing route has expired.
    Expired,
    /// Same sequence number and the candidate path is strictly shorter.
    ShorterPath,
    /// Existing route is at least as good; keep it.
    Keep,
}

impl RouteUpdateDecision {
    #[must_use]
    pub fn replaces(self) -> bool {
        !matches!(self, RouteUpdateDecision::Keep)
    }
}

/// Decide whether a candidate route (`sequence`, `hop_count`) should replace
/// `existing`.
///
/// Evaluates, in order:
/// 1. Existing sequence invalid → `UnknownSequence`
/// 2. Candidate sequence greater → `FresherSequence`
/// 3. Equal sequence, existing inactive → `Expired`
/// 4. Equal sequence, candidate hop count smaller → `ShorterPath`
/// 5. Otherwise → `Keep`
#[must_use]
pub fn decide_route_update(
    existing: &RouteEntry,
    sequence: u8,
    hop_count: u8,
    now: u64,
) -> RouteUpdateDecision {
    if !existing.sequence_valid {
        RouteUpdateDecision::UnknownSequence
    } else if sequence > existing.destination_sequence {
        RouteUpdateDecision::FresherSequence
    } else if sequence == existing.destination_sequence && !existing.is_active(now) {
        RouteUpdateDecision::Expired
    } else if sequence == existing.destination_sequence && hop_count < existing.hop_count {
        RouteUpdateDecision::ShorterPath
    } else {
        RouteUpdateDecision::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aodv_core::types::NodeAddress;

    const NOW: u64 = 10_000;

    fn make_entry(sequence: u8, valid: bool, hop_count: u8, lifetime: u64) -> RouteEntry {
        let mut entry = RouteEntry::new(NodeAddress::new(0x0D));
        entry.destination_sequence = sequence;
        entry.sequence_valid = valid;
        entry.hop_count = hop_count;
        entry.lifetime = lifetime;
        entry
    }

    #[test]
    fn invalid_sequence_always_replaced() {
        let entry = make_entry(200, false, 1, NOW + 1_000);
        let decision = decide_route_update(&entry, 0, 50, NOW);
        assert_eq!(decision, RouteUpdateDecision::UnknownSequence);
        assert!(decision.replaces());
    }

    #[test]
    fn fresher_sequence_replaces_even_if_longer() {
        let entry = make_entry(5, true, 1, NOW + 1_000);
        let decision = decide_route_update(&entry, 6, 9, NOW);
        assert_eq!(decision, RouteUpdateDecision::FresherSequence);
    }

    #[test]
    fn shorter_path_wins_on_tie() {
        let entry = make_entry(5, true, 3, NOW + 1_000);
        let decision = decide_route_update(&entry, 5, 2, NOW);
        assert_eq!(decision, RouteUpdateDecision::ShorterPath);
    }

    #[test]
    fn stale_sequence_loses() {
        let entry = make_entry(5, true, 3, NOW + 1_000);
        let decision = decide_route_update(&entry, 4, 1, NOW);
        assert_eq!(decision, RouteUpdateDecision::Keep);
        assert!(!decision.replaces());
    }

    #[test]
    fn equal_hops_on_tie_keeps() {
        let entry = make_entry(5, true, 3, NOW + 1_000);
        assert_eq!(
            decide_route_update(&entry, 5, 3, NOW),
            RouteUpdateDecision::Keep
        );
    }

    #[test]
    fn expired_route_replaced_on_tie() {
        let entry = make_entry(5, true, 1, NOW);
        assert_eq!(
            decide_route_update(&entry, 5, 9, NOW),
            RouteUpdateDecision::Expired
        );
    }

    #[test]
    fn expired_route_still_beats_stale_sequence() {
        let entry = make_entry(5, true, 1, 0);
        assert_eq!(
            decide_route_update(&entry, 4, 1, NOW),
            RouteUpdateDecision::Keep
        );
    }
}
