//! Inbound frame handling: decode, then hand to the matching engine entry point.
//!
//! Kept apart from [`crate::node`] so decode and dispatch can be tested
//! against a bare router without a running actor.

use aodv_core::message::{Message, decode};
use aodv_core::types::NodeAddress;
use aodv_routing::{
    AodvRouter, Clock, DataOutcome, ReplyOutcome, RequestOutcome, RetryScheduler, RoutingCallback,
};

use crate::error::NodeError;

/// What the engine did with an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    Request(RequestOutcome),
    Reply(ReplyOutcome),
    Data(DataOutcome),
}

/// Decode `frame` heard from `previous_hop` and process it.
///
/// Undecodable frames return [`NodeError::Packet`] and never touch the
/// route table.
pub fn ingest_frame<C, S, K>(
    router: &mut AodvRouter<C, S, K>,
    previous_hop: NodeAddress,
    frame: &[u8],
) -> Result<Ingested, NodeError>
where
    C: RoutingCallback,
    S: RetryScheduler,
    K: Clock,
{
    let message = decode(frame)?;
    tracing::debug!(prev_hop = %previous_hop, %message, "frame received");
    let ingested = match message {
        Message::RouteRequest(request) => {
            Ingested::Request(router.process_route_request(request, previous_hop)?)
        }
        Message::RouteReply(reply) => {
            Ingested::Reply(router.process_route_reply(reply, previous_hop)?)
        }
        Message::UserData(data) => {
            Ingested::Data(router.process_user_data_from(data, previous_hop)?)
        }
    };
    Ok(ingested)
}
