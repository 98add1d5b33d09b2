//! Domain ports implemented by outbound adapters.

mod macros;
mod snapshot_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use snapshot_repository::MockSnapshotRepository;
pub use snapshot_repository::{SnapshotRepository, SnapshotRepositoryError};
