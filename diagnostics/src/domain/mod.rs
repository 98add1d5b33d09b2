//! Domain types, ports, and the snapshot reporting service.

pub mod ports;
mod reporter;
mod snapshot;

pub use reporter::SnapshotReporter;
pub use snapshot::{ColumnDescription, DispatchSnapshot, DriverRow, RelationDescription, UserRow};
