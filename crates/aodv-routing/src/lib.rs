//! Routing layer for the AODV mesh stack.
//!
//! This crate holds the route table and its freshness rules, duplicate
//! request suppression, retry scheduling, and the routing engine that ties
//! them together behind a transport-agnostic callback.

pub mod callback;
pub mod clock;
pub mod dedup;
pub mod error;
pub mod route;
pub mod route_decision;
pub mod router;
pub mod scheduler;
pub mod timing;

pub use callback::{DESTINATION_UNREACHABLE, RecordingCallback, RoutingCallback};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RouterError;
pub use route::{RouteEntry, RouteTable, RouteTableDump};
pub use router::{AodvRouter, DataOutcome, ReplyOutcome, RequestOutcome};
pub use scheduler::{RetryQueue, RetryScheduler, RetryTask};
pub use timing::ProtocolTiming;
