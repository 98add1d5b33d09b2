//! Snapshot reporting service.

use tracing::{error, info};

use crate::domain::ports::{SnapshotRepository, SnapshotRepositoryError};
use crate::domain::snapshot::{DispatchSnapshot, RelationDescription};

/// Reads dispatch snapshots through a [`SnapshotRepository`].
#[derive(Debug, Clone)]
pub struct SnapshotReporter<R> {
    repository: R,
}

impl<R: SnapshotRepository> SnapshotReporter<R> {
    /// Create a reporter over `repository`.
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Load the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the repository's connection or query error unchanged.
    pub fn report(&self) -> Result<DispatchSnapshot, SnapshotRepositoryError> {
        match self.repository.load_snapshot() {
            Ok(snapshot) => {
                info!(
                    database = %snapshot.database,
                    users = snapshot.users.len(),
                    drivers = snapshot.drivers.len(),
                    "loaded dispatch snapshot"
                );
                Ok(snapshot)
            }
            Err(err) => {
                error!(error = %err, "dispatch snapshot failed");
                Err(err)
            }
        }
    }

    /// Describe `relation` in the current schema.
    ///
    /// Blank names are reported as missing without touching the store.
    ///
    /// # Errors
    ///
    /// Returns the repository's connection or query error unchanged.
    pub fn describe(&self, relation: &str) -> Result<RelationDescription, SnapshotRepositoryError> {
        let name = relation.trim();
        if name.is_empty() {
            return Ok(RelationDescription::missing(name));
        }

        let description = self.repository.describe_relation(name).inspect_err(|err| {
            error!(relation = name, error = %err, "relation lookup failed");
        })?;
        info!(
            relation = name,
            exists = description.exists,
            columns = description.columns.len(),
            "described relation"
        );
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockSnapshotRepository;
    use crate::domain::snapshot::{ColumnDescription, DriverRow};
    use mockall::predicate::eq;

    fn empty_snapshot() -> DispatchSnapshot {
        DispatchSnapshot {
            database: "taxi_dispatch".to_owned(),
            users: Vec::new(),
            drivers: Vec::new(),
        }
    }

    #[test]
    fn report_returns_repository_snapshot() {
        let mut repository = MockSnapshotRepository::new();
        let mut expected = empty_snapshot();
        expected.drivers.push(DriverRow {
            id: Some("1".to_owned()),
            user_id: Some("2".to_owned()),
            availability: Some("offline".to_owned()),
        });
        let returned = expected.clone();
        repository
            .expect_load_snapshot()
            .times(1)
            .return_once(move || Ok(returned));

        let snapshot = SnapshotReporter::new(repository)
            .report()
            .expect("snapshot loads");

        assert_eq!(snapshot, expected);
    }

    #[test]
    fn report_surfaces_single_connection_error() {
        let mut repository = MockSnapshotRepository::new();
        repository
            .expect_load_snapshot()
            .times(1)
            .return_once(|| Err(SnapshotRepositoryError::connection("connection refused")));

        let err = SnapshotReporter::new(repository)
            .report()
            .expect_err("unreachable store");

        assert_eq!(err, SnapshotRepositoryError::connection("connection refused"));
    }

    #[test]
    fn describe_trims_relation_names() {
        let mut repository = MockSnapshotRepository::new();
        repository
            .expect_describe_relation()
            .with(eq("drivers"))
            .times(1)
            .returning(|name| {
                Ok(RelationDescription {
                    name: name.to_owned(),
                    exists: true,
                    columns: vec![ColumnDescription {
                        name: "availability".to_owned(),
                        data_type: "text".to_owned(),
                    }],
                })
            });

        let description = SnapshotReporter::new(repository)
            .describe("  drivers ")
            .expect("describe");

        assert!(description.exists);
        assert_eq!(description.name, "drivers");
    }

    #[test]
    fn describe_skips_store_for_blank_names() {
        let mut repository = MockSnapshotRepository::new();
        repository.expect_describe_relation().never();

        let description = SnapshotReporter::new(repository)
            .describe("   ")
            .expect("blank names are missing");

        assert!(!description.exists);
    }
}
