//! Outcomes reported by the routing engine's entry points.

use aodv_core::types::NodeAddress;

use crate::route_decision::RouteUpdateDecision;

/// What happened to an inbound route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Same request id and originator seen before; dropped.
    Duplicate,
    /// This node is the destination and replied to the previous hop.
    Answered { to: NodeAddress },
    /// An intermediate node with a fresh enough route replied on the
    /// destination's behalf.
    AnsweredFromRoute { to: NodeAddress },
    /// No usable route; the request was rebroadcast one hop further.
    Rebroadcast,
}

/// What happened to an inbound route reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// Result of comparing the reply against the existing forward route.
    pub decision: RouteUpdateDecision,
    /// Neighbor the reply was relayed to, if this node is not the originator
    /// and knows a way back.
    pub forwarded_to: Option<NodeAddress>,
}

/// State of one user-data send after an entry point returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOutcome {
    /// Addressed to this node and handed to the application.
    Delivered,
    /// Sent to the next hop of an active route.
    Forwarded { next_hop: NodeAddress },
    /// A route request went out and a retry is scheduled.
    Discovering { retries: u8 },
    /// Retries exhausted; the data was dropped.
    Unreachable,
}
