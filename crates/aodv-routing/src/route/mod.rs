//! Route table and route entries.

pub mod entry;
pub mod table;

pub use entry::RouteEntry;
pub use table::{RouteRow, RouteTable, RouteTableDump};
