//! Read-only snapshots of dispatch rows and relation metadata.
//!
//! Values are kept as text exactly as the database rendered them; `None`
//! stands for SQL `NULL` and is shown as `NULL`.

use std::fmt;

const NULL_LABEL: &str = "NULL";

/// One row of the `users` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// `users.id`.
    pub id: Option<String>,
    /// `users.email`.
    pub email: Option<String>,
    /// `users.role`.
    pub role: Option<String>,
}

/// One row of the `drivers` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRow {
    /// `drivers.id`.
    pub id: Option<String>,
    /// `drivers.user_id`.
    pub user_id: Option<String>,
    /// `drivers.availability`.
    pub availability: Option<String>,
}

/// Everything the snapshot reporter prints in one run.
///
/// # Examples
///
/// ```
/// use dispatch_diagnostics::domain::{DispatchSnapshot, UserRow};
///
/// let snapshot = DispatchSnapshot {
///     database: "taxi_dispatch".to_owned(),
///     users: vec![UserRow {
///         id: Some("1".to_owned()),
///         email: Some("admin@taxi.com".to_owned()),
///         role: Some("admin".to_owned()),
///     }],
///     drivers: Vec::new(),
/// };
///
/// assert!(snapshot.to_string().contains("  1: admin@taxi.com (admin)"));
/// assert!(snapshot.to_string().ends_with("Drivers Count: 0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSnapshot {
    /// Name reported by `current_database()`.
    pub database: String,
    /// Rows of `users` in query order.
    pub users: Vec<UserRow>,
    /// Rows of `drivers` in query order.
    pub drivers: Vec<DriverRow>,
}

impl fmt::Display for DispatchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- DB DUMP ---")?;
        writeln!(f, "Database: {}", self.database)?;
        write!(f, "Users Count: {}", self.users.len())?;
        for user in &self.users {
            write!(
                f,
                "\n  {}: {} ({})",
                or_null(user.id.as_deref()),
                or_null(user.email.as_deref()),
                or_null(user.role.as_deref())
            )?;
        }
        write!(f, "\nDrivers Count: {}", self.drivers.len())?;
        for driver in &self.drivers {
            write!(
                f,
                "\n  Driver {} (User {}): {}",
                or_null(driver.id.as_deref()),
                or_null(driver.user_id.as_deref()),
                or_null(driver.availability.as_deref())
            )?;
        }
        Ok(())
    }
}

/// A column reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name.
    pub name: String,
    /// SQL data type as reported by the catalog.
    pub data_type: String,
}

/// Existence and shape of a relation in the current schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescription {
    /// Relation name that was looked up.
    pub name: String,
    /// Whether the relation exists.
    pub exists: bool,
    /// Columns in ordinal order; empty when the relation does not exist.
    pub columns: Vec<ColumnDescription>,
}

impl RelationDescription {
    /// Description of a relation that was not found.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exists: false,
            columns: Vec::new(),
        }
    }
}

impl fmt::Display for RelationDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exists {
            return write!(f, "Table {} DOES NOT EXIST", self.name);
        }
        write!(f, "Table {}:", self.name)?;
        for column in &self.columns {
            write!(f, "\n  {}: {}", column.name, column.data_type)?;
        }
        Ok(())
    }
}

fn or_null(value: Option<&str>) -> &str {
    value.unwrap_or(NULL_LABEL)
}
