//! Port abstraction for reading dispatch data from the backing store.

use crate::domain::snapshot::{DispatchSnapshot, RelationDescription};

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading a dispatch snapshot.
    pub enum SnapshotRepositoryError {
        /// Connection to the backing datastore failed.
        Connection {
            /// Driver error message.
            message: String,
        } => "database connection failed: {message}",
        /// A read query failed.
        Query {
            /// Driver error message.
            message: String,
        } => "database query failed: {message}",
    }
}

/// Port for read-only access to the dispatch database.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotRepository: Send + Sync {
    /// Load the database name with every user and driver row.
    ///
    /// Either the whole snapshot is returned or a single error; partial
    /// results are never surfaced.
    fn load_snapshot(&self) -> Result<DispatchSnapshot, SnapshotRepositoryError>;

    /// Report whether `relation` exists and list its columns.
    fn describe_relation(
        &self,
        relation: &str,
    ) -> Result<RelationDescription, SnapshotRepositoryError>;
}
