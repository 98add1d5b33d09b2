//! Diagnostic commands for the taxi-dispatch backend.
//!
//! The crate wires three read-only diagnostics behind small binaries:
//!
//! - `db-snapshot` dumps `users` and `drivers` from PostgreSQL and can
//!   describe further relations;
//! - `decode-text` and `transcode-text` recover text from files of unknown
//!   encoding via [`text_probe`];
//! - `inspect-bytes` shows file sizes and leading raw bytes.
//!
//! Configuration is read once into [`config::ConnectionParams`] and passed to
//! the PostgreSQL adapter explicitly. Failures are typed; the binaries print
//! them and apply the selected [`cli::ExitPolicy`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

use config::ConnectionParams;
use domain::ports::SnapshotRepositoryError;
use domain::{DispatchSnapshot, RelationDescription, SnapshotReporter};
use outbound::persistence::PostgresSnapshotRepository;

/// Build a reporter backed by PostgreSQL.
#[must_use]
pub fn postgres_reporter(params: ConnectionParams) -> SnapshotReporter<PostgresSnapshotRepository> {
    SnapshotReporter::new(PostgresSnapshotRepository::new(params))
}

/// Connect with `params` and load the dispatch snapshot.
///
/// # Errors
///
/// Returns a single [`SnapshotRepositoryError`] when the connection or any
/// query fails; no partial snapshot is produced.
pub fn report(params: &ConnectionParams) -> Result<DispatchSnapshot, SnapshotRepositoryError> {
    postgres_reporter(params.clone()).report()
}

/// Connect with `params` and describe `relation`.
///
/// # Errors
///
/// Returns a [`SnapshotRepositoryError`] when the connection or lookup fails.
pub fn describe(
    params: &ConnectionParams,
    relation: &str,
) -> Result<RelationDescription, SnapshotRepositoryError> {
    postgres_reporter(params.clone()).describe(relation)
}
