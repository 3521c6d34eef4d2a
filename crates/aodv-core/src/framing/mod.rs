//! Text framing for transports that only carry printable lines.

pub mod armor;

pub use armor::{armor, unarmor};
