//! PostgreSQL persistence adapters.

mod postgres_snapshot_repository;

pub use postgres_snapshot_repository::PostgresSnapshotRepository;
