//! The AODV routing engine.
//!
//! The engine owns the route table and reacts to inbound route requests,
//! route replies and user data, emitting messages through a
//! [`RoutingCallback`](crate::callback::RoutingCallback).

pub mod engine;
pub mod types;

pub use engine::AodvRouter;
pub use types::{DataOutcome, ReplyOutcome, RequestOutcome};
