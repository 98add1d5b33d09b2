//! PostgreSQL-backed adapter for dispatch snapshots and relation lookups.
//!
//! Every call opens its own connection and drops it before returning, on the
//! error paths as well. Row values are cast to text in SQL so the output does
//! not depend on the exact column types of a given deployment.

use postgres::{Client, NoTls, Row};

use crate::config::ConnectionParams;
use crate::domain::ports::{SnapshotRepository, SnapshotRepositoryError};
use crate::domain::{
    ColumnDescription, DispatchSnapshot, DriverRow, RelationDescription, UserRow,
};

const DATABASE_NAME_QUERY: &str = "SELECT current_database()::text AS database_name";

const USERS_QUERY: &str = concat!(
    "SELECT id::text AS id, email::text AS email, role::text AS role ",
    "FROM users"
);

const DRIVERS_QUERY: &str = concat!(
    "SELECT id::text AS id, user_id::text AS user_id, availability::text AS availability ",
    "FROM drivers"
);

const RELATION_EXISTS_QUERY: &str = concat!(
    "SELECT EXISTS (",
    "  SELECT 1 ",
    "  FROM information_schema.tables ",
    "  WHERE table_schema::text = current_schema()::text ",
    "    AND table_name::text = $1::text",
    ") AS relation_exists"
);

const RELATION_COLUMNS_QUERY: &str = concat!(
    "SELECT column_name::text AS column_name, data_type::text AS data_type ",
    "FROM information_schema.columns ",
    "WHERE table_schema::text = current_schema()::text ",
    "  AND table_name::text = $1::text ",
    "ORDER BY ordinal_position"
);

/// Reads dispatch rows from PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresSnapshotRepository {
    params: ConnectionParams,
}

impl PostgresSnapshotRepository {
    /// Construct a repository for the given connection parameters.
    ///
    /// No connection is opened until a port method is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dispatch_diagnostics::config::{ConnectionParams, DbSettings};
    /// use dispatch_diagnostics::outbound::persistence::PostgresSnapshotRepository;
    ///
    /// let settings = DbSettings {
    ///     password: Some("postgres".to_owned()),
    ///     ..DbSettings::default()
    /// };
    /// let params = ConnectionParams::from_settings(&settings).expect("valid settings");
    /// let repository = PostgresSnapshotRepository::new(params);
    ///
    /// let _ = repository;
    /// ```
    #[must_use]
    pub const fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    fn connect(&self) -> Result<Client, SnapshotRepositoryError> {
        self.params
            .to_pg_config()
            .connect(NoTls)
            .map_err(|error| SnapshotRepositoryError::connection(error.to_string()))
    }
}

impl SnapshotRepository for PostgresSnapshotRepository {
    fn load_snapshot(&self) -> Result<DispatchSnapshot, SnapshotRepositoryError> {
        let mut client = self.connect()?;

        let database = query_database_name(&mut client)?;
        let users = query_rows(&mut client, USERS_QUERY, |row| {
            Ok(UserRow {
                id: text_column(row, "id")?,
                email: text_column(row, "email")?,
                role: text_column(row, "role")?,
            })
        })?;
        let drivers = query_rows(&mut client, DRIVERS_QUERY, |row| {
            Ok(DriverRow {
                id: text_column(row, "id")?,
                user_id: text_column(row, "user_id")?,
                availability: text_column(row, "availability")?,
            })
        })?;

        Ok(DispatchSnapshot {
            database,
            users,
            drivers,
        })
    }

    fn describe_relation(
        &self,
        relation: &str,
    ) -> Result<RelationDescription, SnapshotRepositoryError> {
        let mut client = self.connect()?;

        let exists: bool = client
            .query_one(RELATION_EXISTS_QUERY, &[&relation])
            .and_then(|row| row.try_get("relation_exists"))
            .map_err(|error| SnapshotRepositoryError::query(error.to_string()))?;
        if !exists {
            return Ok(RelationDescription::missing(relation));
        }

        let columns = client
            .query(RELATION_COLUMNS_QUERY, &[&relation])
            .map_err(|error| SnapshotRepositoryError::query(error.to_string()))?
            .iter()
            .map(|row| {
                Ok(ColumnDescription {
                    name: required_text(row, "column_name")?,
                    data_type: required_text(row, "data_type")?,
                })
            })
            .collect::<Result<Vec<_>, SnapshotRepositoryError>>()?;

        Ok(RelationDescription {
            name: relation.to_owned(),
            exists,
            columns,
        })
    }
}

fn query_database_name(client: &mut Client) -> Result<String, SnapshotRepositoryError> {
    let row = client
        .query_one(DATABASE_NAME_QUERY, &[])
        .map_err(|error| SnapshotRepositoryError::query(error.to_string()))?;
    required_text(&row, "database_name")
}

fn query_rows<T>(
    client: &mut Client,
    query: &str,
    map_row: impl Fn(&Row) -> Result<T, SnapshotRepositoryError>,
) -> Result<Vec<T>, SnapshotRepositoryError> {
    client
        .query(query, &[])
        .map_err(|error| SnapshotRepositoryError::query(error.to_string()))?
        .iter()
        .map(map_row)
        .collect()
}

fn text_column(row: &Row, column: &str) -> Result<Option<String>, SnapshotRepositoryError> {
    row.try_get(column)
        .map_err(|error| SnapshotRepositoryError::query(format!("column {column}: {error}")))
}

fn required_text(row: &Row, column: &str) -> Result<String, SnapshotRepositoryError> {
    text_column(row, column)?
        .ok_or_else(|| SnapshotRepositoryError::query(format!("column {column} is NULL")))
}
