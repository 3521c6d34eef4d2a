//! RFC 3561 timing parameters.

use aodv_core::constants::{
    ACTIVE_ROUTE_TIMEOUT, NET_DIAMETER, NODE_TRAVERSAL_TIME, RREQ_RETRIES,
};

/// Base timing values; the derived values are computed from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolTiming {
    /// Milliseconds a route stays active without traffic.
    pub active_route_timeout: u64,
    /// Conservative per-hop traversal estimate in milliseconds.
    pub node_traversal_time: u64,
    /// Maximum number of hops between two nodes in the mesh.
    pub net_diameter: u64,
    /// Route requests sent for one data item before giving up, after the first.
    pub rreq_retries: u8,
}

impl ProtocolTiming {
    /// Lifetime advertised in replies generated by the destination.
    pub fn my_route_timeout(&self) -> u64 {
        2 * self.active_route_timeout
    }

    pub fn net_traversal_time(&self) -> u64 {
        2 * self.node_traversal_time * self.net_diameter
    }

    pub fn path_discovery_time(&self) -> u64 {
        2 * self.net_traversal_time()
    }

    /// Lowest lifetime a reverse route learned `hop_count` hops away may have.
    ///
    /// `now + 2 * NET_TRAVERSAL_TIME - 2 * hop_count * NODE_TRAVERSAL_TIME`,
    /// never earlier than `now`.
    pub fn minimal_lifetime(&self, now: u64, hop_count: u8) -> u64 {
        let budget = 2 * self.net_traversal_time();
        let spent = 2 * u64::from(hop_count) * self.node_traversal_time;
        now + budget.saturating_sub(spent)
    }

    /// Delay before retry number `retries + 1`: `2^retries * NET_TRAVERSAL_TIME`.
    pub fn retry_delay(&self, retries: u8) -> u64 {
        let factor = 1u64.checked_shl(u32::from(retries)).unwrap_or(u64::MAX);
        self.net_traversal_time().saturating_mul(factor)
    }
}

impl Default for ProtocolTiming {
    fn default() -> Self {
        Self {
            active_route_timeout: ACTIVE_ROUTE_TIMEOUT,
            node_traversal_time: NODE_TRAVERSAL_TIME,
            net_diameter: NET_DIAMETER,
            rreq_retries: RREQ_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aodv_core::constants::{MY_ROUTE_TIMEOUT, NET_TRAVERSAL_TIME, PATH_DISCOVERY_TIME};

    #[test]
    fn test_defaults_match_constants() {
        let t = ProtocolTiming::default();
        assert_eq!(t.my_route_timeout(), MY_ROUTE_TIMEOUT);
        assert_eq!(t.net_traversal_time(), NET_TRAVERSAL_TIME);
        assert_eq!(t.path_discovery_time(), PATH_DISCOVERY_TIME);
        assert_eq!(t.rreq_retries, 2);
    }

    #[test]
    fn test_minimal_lifetime() {
        let t = ProtocolTiming::default();
        // 2 * 2800 - 2 * 10 * 40 = 4800
        assert_eq!(t.minimal_lifetime(1_000, 10), 5_800);
        assert_eq!(t.minimal_lifetime(1_000, 0), 6_600);
    }

    #[test]
    fn test_minimal_lifetime_saturates_at_now() {
        let t = ProtocolTiming {
            net_diameter: 1,
            ..ProtocolTiming::default()
        };
        // Budget 160ms, 63 hops spend 5040ms.
        assert_eq!(t.minimal_lifetime(500, 63), 500);
    }

    #[test]
    fn test_retry_delay_doubles() {
        let t = ProtocolTiming::default();
        assert_eq!(t.retry_delay(0), 2_800);
        assert_eq!(t.retry_delay(1), 5_600);
        assert_eq!(t.retry_delay(2), 11_200);
        assert_eq!(t.retry_delay(200), u64::MAX);
    }

    #[test]
    fn test_derived_values_follow_configuration() {
        let t = ProtocolTiming {
            active_route_timeout: 1_000,
            node_traversal_time: 10,
            net_diameter: 5,
            rreq_retries: 0,
        };
        assert_eq!(t.my_route_timeout(), 2_000);
        assert_eq!(t.net_traversal_time(), 100);
        assert_eq!(t.path_discovery_time(), 200);
    }
}
