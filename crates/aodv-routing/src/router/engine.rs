//! Route request, route reply and user data processing.

use aodv_core::constants::{MAX_REPLY_LIFETIME, MAX_REQUEST_ID};
use aodv_core::message::{Message, RouteReply, RouteRequest, UserData};
use aodv_core::types::NodeAddress;

use crate::callback::{DESTINATION_UNREACHABLE, RoutingCallback};
use crate::clock::Clock;
use crate::dedup::RecentRequests;
use crate::error::RouterError;
use crate::route::{RouteTable, RouteTableDump};
use crate::route_decision::decide_route_update;
use crate::router::types::{DataOutcome, ReplyOutcome, RequestOutcome};
use crate::scheduler::{RetryScheduler, RetryTask};
use crate::timing::ProtocolTiming;

/// Clamp a millisecond lifetime into the 18-bit reply field.
fn reply_lifetime(ms: u64) -> u32 {
    ms.min(u64::from(MAX_REPLY_LIFETIME)) as u32
}

/// AODV routing engine for one node.
///
/// All entry points take `&mut self` and run to completion, so the owner
/// must serialize inbound messages and fired retries onto one context.
pub struct AodvRouter<C, S, K> {
    address: Option<NodeAddress>,
    sequence_number: u8,
    request_id: u8,
    routes: RouteTable,
    recent_requests: RecentRequests,
    timing: ProtocolTiming,
    callback: C,
    scheduler: S,
    clock: K,
}

impl<C, S, K> AodvRouter<C, S, K>
where
    C: RoutingCallback,
    S: RetryScheduler,
    K: Clock,
{
    pub fn new(timing: ProtocolTiming, callback: C, scheduler: S, clock: K) -> Self {
        Self {
            address: None,
            sequence_number: 0,
            request_id: 0,
            routes: RouteTable::new(),
            recent_requests: RecentRequests::new(),
            timing,
            callback,
            scheduler,
            clock,
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: NodeAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Assign this node's address. Must happen before any routing call.
    pub fn set_address(&mut self, address: NodeAddress) {
        tracing::info!(address = %address, "node address set");
        self.address = Some(address);
    }

    pub fn address(&self) -> Option<NodeAddress> {
        self.address
    }

    /// This node's own sequence number.
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Id of the last route request this node originated.
    pub fn request_id(&self) -> u8 {
        self.request_id
    }

    pub fn timing(&self) -> &ProtocolTiming {
        &self.timing
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.routes
    }

    pub fn recent_requests(&self) -> &RecentRequests {
        &self.recent_requests
    }

    pub fn routes_dump(&self) -> RouteTableDump {
        self.routes.dump(self.clock.now_ms())
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    fn require_address(&self) -> Result<NodeAddress, RouterError> {
        self.address.ok_or(RouterError::AddressNotSet)
    }

    fn send(&mut self, message: Message, destination: NodeAddress) {
        tracing::trace!(%message, destination = %destination, "emit");
        self.callback.send(&message, destination);
    }

    /// Handle a route request received from the neighbor `previous_hop`.
    pub fn process_route_request(
        &mut self,
        request: RouteRequest,
        previous_hop: NodeAddress,
    ) -> Result<RequestOutcome, RouterError> {
        let own = self.require_address()?;
        let now = self.clock.now_ms();

        self.routes
            .upsert_from_neighbor(previous_hop, now, self.timing.active_route_timeout);

        if !self
            .recent_requests
            .observe(request.request_id(), request.originator())
        {
            tracing::debug!(
                request_id = request.request_id(),
                originator = %request.originator(),
                prev_hop = %previous_hop,
                "duplicate route request dropped"
            );
            return Ok(RequestOutcome::Duplicate);
        }

        let request = request.with_incremented_hop_count()?;
        let floor = self.timing.minimal_lifetime(now, request.hop_count());

        let reverse = self.routes.get_or_create(request.originator());
        reverse.destination_sequence = reverse
            .destination_sequence
            .max(request.originator_sequence());
        reverse.sequence_valid = true;
        reverse.next_hop = previous_hop;
        reverse.hop_count = request.hop_count();
        reverse.extend_lifetime(floor);

        if request.destination() == own {
            return self.answer_as_destination(&request, previous_hop);
        }

        let destination_sequence = request.destination_sequence();
        let fresh = self.routes.get_mut(request.destination()).filter(|route| {
            route.is_active(now)
                && route.sequence_valid
                && route.destination_sequence >= destination_sequence
        });
        if let Some(forward) = fresh {
            forward.add_precursor(previous_hop);
            let next_hop = forward.next_hop;
            let sequence = forward.destination_sequence;
            let hop_count = forward.hop_count;
            let remaining = forward.remaining(now);

            self.routes
                .get_or_create(request.originator())
                .add_precursor(next_hop);

            let reply = RouteReply::new(
                reply_lifetime(remaining),
                request.destination(),
                sequence,
                request.originator(),
                hop_count,
            )?;
            tracing::debug!(
                dest = %request.destination(),
                originator = %request.originator(),
                prev_hop = %previous_hop,
                "answering route request from known route"
            );
            self.send(reply.into(), previous_hop);
            return Ok(RequestOutcome::AnsweredFromRoute { to: previous_hop });
        }

        tracing::debug!(
            dest = %request.destination(),
            originator = %request.originator(),
            hops = request.hop_count(),
            "no fresh route, rebroadcasting request"
        );
        self.send(request.into(), NodeAddress::BROADCAST);
        Ok(RequestOutcome::Rebroadcast)
    }

    fn answer_as_destination(
        &mut self,
        request: &RouteRequest,
        previous_hop: NodeAddress,
    ) -> Result<RequestOutcome, RouterError> {
        let bumped = self.sequence_number.wrapping_add(1);
        if request.destination_sequence() == bumped {
            self.sequence_number = bumped;
        }

        let reply = RouteReply::new(
            reply_lifetime(self.timing.my_route_timeout()),
            request.destination(),
            self.sequence_number,
            request.originator(),
            0,
        )?;
        tracing::info!(
            originator = %request.originator(),
            prev_hop = %previous_hop,
            sequence = self.sequence_number,
            "answering route request as destination"
        );
        self.send(reply.into(), previous_hop);
        Ok(RequestOutcome::Answered { to: previous_hop })
    }

    /// Handle a route reply received from the neighbor `previous_hop`.
    pub fn process_route_reply(
        &mut self,
        reply: RouteReply,
        previous_hop: NodeAddress,
    ) -> Result<ReplyOutcome, RouterError> {
        let own = self.require_address()?;
        let now = self.clock.now_ms();

        self.routes
            .upsert_from_neighbor(previous_hop, now, self.timing.active_route_timeout);

        let reply = reply.with_incremented_hop_count()?;

        let forward = self.routes.get_or_create(reply.destination());
        let decision = decide_route_update(
            forward,
            reply.destination_sequence(),
            reply.hop_count(),
            now,
        );
        if decision.replaces() {
            forward.sequence_valid = true;
            forward.next_hop = previous_hop;
            forward.hop_count = reply.hop_count();
            forward.lifetime = now + u64::from(reply.lifetime());
            forward.destination_sequence = reply.destination_sequence();
            tracing::info!(
                dest = %reply.destination(),
                next_hop = %previous_hop,
                hops = reply.hop_count(),
                sequence = reply.destination_sequence(),
                ?decision,
                "route established"
            );
        } else {
            tracing::debug!(
                dest = %reply.destination(),
                sequence = reply.destination_sequence(),
                hops = reply.hop_count(),
                "route reply did not improve existing route"
            );
        }

        if reply.originator() == own {
            return Ok(ReplyOutcome {
                decision,
                forwarded_to: None,
            });
        }

        let back = self.routes.get(reply.originator()).map(|route| route.next_hop);
        match back {
            Some(next_hop) => {
                if let Some(forward) = self.routes.get_mut(reply.destination()) {
                    forward.add_precursor(next_hop);
                }
                self.send(reply.into(), next_hop);
            }
            None => {
                tracing::warn!(
                    originator = %reply.originator(),
                    dest = %reply.destination(),
                    "no reverse route for route reply, dropping"
                );
            }
        }
        Ok(ReplyOutcome {
            decision,
            forwarded_to: back,
        })
    }

    /// Send data originating at this node.
    pub fn process_user_data(&mut self, data: UserData) -> Result<DataOutcome, RouterError> {
        self.handle_user_data(data, None, 0)
    }

    /// Handle data received from the neighbor `previous_hop`.
    pub fn process_user_data_from(
        &mut self,
        data: UserData,
        previous_hop: NodeAddress,
    ) -> Result<DataOutcome, RouterError> {
        self.handle_user_data(data, Some(previous_hop), 0)
    }

    /// Re-enter user data processing for a fired retry.
    pub fn run_retry(&mut self, task: RetryTask) -> Result<DataOutcome, RouterError> {
        tracing::debug!(
            dest = %task.destination(),
            retries = task.retries,
            "retry fired"
        );
        self.handle_user_data(task.data, task.previous_hop, task.retries)
    }

    fn handle_user_data(
        &mut self,
        data: UserData,
        previous_hop: Option<NodeAddress>,
        retries: u8,
    ) -> Result<DataOutcome, RouterError> {
        let own = self.require_address()?;
        let now = self.clock.now_ms();
        let destination = data.destination();

        if destination == own {
            tracing::debug!(%data, "delivering user data locally");
            self.callback.deliver(&data);
            return Ok(DataOutcome::Delivered);
        }

        if let Some(next_hop) = self
            .routes
            .active(destination, now)
            .map(|route| route.next_hop)
        {
            let until = now + self.timing.active_route_timeout;
            let refreshed = [Some(destination), previous_hop, Some(next_hop)];
            for address in refreshed.into_iter().flatten() {
                if let Some(route) = self.routes.get_mut(address) {
                    route.extend_lifetime(until);
                }
            }
            tracing::debug!(dest = %destination, next_hop = %next_hop, "forwarding user data");
            self.send(data.into(), next_hop);
            return Ok(DataOutcome::Forwarded { next_hop });
        }

        if retries > self.timing.rreq_retries {
            tracing::info!(
                dest = %destination,
                attempts = retries,
                "route discovery exhausted, dropping user data"
            );
            self.callback.on_unreachable(DESTINATION_UNREACHABLE);
            return Ok(DataOutcome::Unreachable);
        }

        let known = self
            .routes
            .get(destination)
            .map(|route| route.destination_sequence);
        self.request_id = (self.request_id + 1) & MAX_REQUEST_ID;
        self.sequence_number = self.sequence_number.wrapping_add(1);

        let request = RouteRequest::new(
            0,
            self.request_id,
            destination,
            known.unwrap_or(0),
            known.is_none(),
            own,
            self.sequence_number,
        )?;
        // Our own request will come back from neighbors; treat it as seen.
        self.recent_requests.observe(self.request_id, own);

        tracing::info!(
            dest = %destination,
            request_id = self.request_id,
            attempt = retries + 1,
            "starting route discovery"
        );
        self.send(request.into(), NodeAddress::BROADCAST);

        let delay = self.timing.retry_delay(retries);
        let next = retries.saturating_add(1);
        self.scheduler.schedule(
            RetryTask {
                data,
                previous_hop,
                retries: next,
            },
            delay,
        );
        Ok(DataOutcome::Discovering { retries: next })
    }
}
