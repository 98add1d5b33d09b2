//! Database connection settings loaded via OrthoConfig.
//!
//! Settings come from `DB_*` environment variables, optionally seeded from a
//! `.env` file, and are resolved once into [`ConnectionParams`] which the
//! PostgreSQL adapter receives explicitly.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Host used when `DB_HOST` is unset.
pub const DEFAULT_HOST: &str = "localhost";
/// Port used when `DB_PORT` is unset.
pub const DEFAULT_PORT: u16 = 5432;
/// Role used when `DB_USER` is unset.
pub const DEFAULT_USER: &str = "postgres";
/// Database used when `DB_NAME` is unset.
pub const DEFAULT_DATABASE: &str = "taxi_dispatch";
/// Connect timeout used when `DB_CONNECT_TIMEOUT_SECS` is unset.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const APPLICATION_NAME: &str = "dispatch-diagnostics";

/// Errors raised while loading or validating connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Settings could not be read from the environment.
    #[error("failed to load database settings: {message}")]
    Load {
        /// Loader error message.
        message: String,
    },
    /// A `.env` file was named but could not be loaded.
    #[error("failed to load env file '{path}': {message}")]
    EnvFile {
        /// Path to the env file.
        path: PathBuf,
        /// Loader error message.
        message: String,
    },
    /// `DB_PASSWORD` is unset or empty.
    #[error("DB_PASSWORD must be set")]
    MissingPassword,
    /// A setting is present but unusable.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Environment variable holding the value.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Raw database settings as read from the environment.
///
/// `port` always carries a value so the merged layer is never empty, even
/// when no `DB_*` variable is set.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DbSettings {
    /// Server host name or socket directory.
    pub host: Option<String>,
    /// Server port.
    #[ortho_config(default = 5432)]
    pub port: u16,
    /// Login role.
    pub user: Option<String>,
    /// Login password; required.
    pub password: Option<String>,
    /// Database name.
    pub name: Option<String>,
    /// Seconds to wait for a connection before giving up.
    pub connect_timeout_secs: Option<u64>,
}

impl DbSettings {
    /// Read settings from `DB_*` environment variables.
    ///
    /// `program` is only used as the argument vector's first element; no
    /// command-line flags are consumed here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a variable cannot be parsed.
    pub fn from_environment(program: &str) -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Configured host, falling back to [`DEFAULT_HOST`].
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port; [`DEFAULT_PORT`] unless `DB_PORT` is set.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Configured role, falling back to [`DEFAULT_USER`].
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// Configured database, falling back to [`DEFAULT_DATABASE`].
    #[must_use]
    pub fn database(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// Configured connect timeout, falling back to
    /// [`DEFAULT_CONNECT_TIMEOUT_SECS`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            user: None,
            password: None,
            name: None,
            connect_timeout_secs: None,
        }
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Validated connection parameters for the PostgreSQL adapter.
///
/// ## Invariants
/// - `host`, `user`, and `database` are non-empty after trimming.
/// - `port` is non-zero.
/// - `password` is non-empty and never appears in `Debug` output.
///
/// # Examples
///
/// ```
/// use dispatch_diagnostics::config::{ConnectionParams, DbSettings};
///
/// let settings = DbSettings {
///     password: Some("secret".to_owned()),
///     ..DbSettings::default()
/// };
/// let params = ConnectionParams::from_settings(&settings).expect("valid settings");
///
/// assert_eq!(params.host(), "localhost");
/// assert_eq!(params.port(), 5432);
/// assert_eq!(params.database(), "taxi_dispatch");
/// assert!(!format!("{params:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    user: String,
    password: Zeroizing<String>,
    database: String,
    connect_timeout: Duration,
}

impl ConnectionParams {
    /// Resolve settings into connection parameters, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPassword`] when no password is set and
    /// [`ConfigError::InvalidValue`] for blank names or a zero port.
    pub fn from_settings(settings: &DbSettings) -> Result<Self, ConfigError> {
        let password = settings
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or(ConfigError::MissingPassword)?;
        let port = settings.port();
        if port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_PORT",
                message: "port must be non-zero".to_owned(),
            });
        }

        Ok(Self {
            host: non_blank("DB_HOST", settings.host())?,
            port,
            user: non_blank("DB_USER", settings.user())?,
            password: Zeroizing::new(password.to_owned()),
            database: non_blank("DB_NAME", settings.database())?,
            connect_timeout: settings.connect_timeout(),
        })
    }

    /// Server host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Login role.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Database name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Build the driver configuration for these parameters.
    #[must_use]
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(self.host.as_str())
            .port(self.port)
            .user(self.user.as_str())
            .password(self.password.as_str())
            .dbname(self.database.as_str())
            .connect_timeout(self.connect_timeout)
            .application_name(APPLICATION_NAME);
        config
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Load a `.env` file into the process environment.
///
/// Variables already set in the environment are left untouched. Without an
/// explicit path, a missing `.env` in the working directory is not an error.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] when an explicit file cannot be loaded
/// or the discovered `.env` is malformed.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(explicit) => {
            dotenvy::from_path(explicit).map_err(|error| ConfigError::EnvFile {
                path: explicit.to_path_buf(),
                message: error.to_string(),
            })?;
            debug!(path = %explicit.display(), "loaded env file");
            Ok(Some(explicit.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!(path = %found.display(), "loaded env file");
                Ok(Some(found))
            }
            Err(error) if error.not_found() => Ok(None),
            Err(error) => Err(ConfigError::EnvFile {
                path: PathBuf::from(".env"),
                message: error.to_string(),
            }),
        },
    }
}

/// Load the env file, read `DB_*` settings, and resolve connection parameters.
///
/// # Errors
///
/// Returns the first [`ConfigError`] raised by any step.
pub fn load_connection_params(
    program: &str,
    env_file: Option<&Path>,
) -> Result<ConnectionParams, ConfigError> {
    load_env_file(env_file)?;
    let settings = DbSettings::from_environment(program)?;
    debug!(?settings, "resolved database settings");
    ConnectionParams::from_settings(&settings)
}

fn non_blank(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            message: "value must not be blank".to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    //! Unit tests for database settings resolution.

    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;
    use std::fs;

    const DB_VARS: [&str; 6] = [
        "DB_HOST",
        "DB_PORT",
        "DB_USER",
        "DB_PASSWORD",
        "DB_NAME",
        "DB_CONNECT_TIMEOUT_SECS",
    ];

    fn cleared_except<'a>(
        overrides: &'a [(&'a str, &'a str)],
    ) -> Vec<(&'a str, Option<String>)> {
        DB_VARS
            .iter()
            .map(|&name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value).to_owned());
                (name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_only_password_is_set() {
        let _guard = lock_env(cleared_except(&[("DB_PASSWORD", "secret")]));

        let settings = DbSettings::from_environment("db-snapshot").expect("settings load");
        let params = ConnectionParams::from_settings(&settings).expect("params resolve");

        assert_eq!(params.host(), DEFAULT_HOST);
        assert_eq!(params.port(), DEFAULT_PORT);
        assert_eq!(params.user(), DEFAULT_USER);
        assert_eq!(params.database(), DEFAULT_DATABASE);
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "dispatcher"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "taxi_staging"),
            ("DB_CONNECT_TIMEOUT_SECS", "3"),
        ]));

        let settings = DbSettings::from_environment("db-snapshot").expect("settings load");
        let params = ConnectionParams::from_settings(&settings).expect("params resolve");

        assert_eq!(params.host(), "db.internal");
        assert_eq!(params.port(), 6543);
        assert_eq!(params.user(), "dispatcher");
        assert_eq!(params.database(), "taxi_staging");
        assert_eq!(settings.connect_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    fn missing_password_is_rejected() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = DbSettings::from_environment("db-snapshot").expect("settings load");

        assert_eq!(
            ConnectionParams::from_settings(&settings),
            Err(ConfigError::MissingPassword)
        );
    }

    #[rstest]
    fn empty_environment_reports_missing_password() {
        let _guard = lock_env(cleared_except(&[]));

        let err = load_connection_params("db-snapshot", None).expect_err("no password");

        assert_eq!(err, ConfigError::MissingPassword);
    }

    #[rstest]
    fn empty_environment_loads_defaults() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = DbSettings::from_environment("db-snapshot").expect("settings load");

        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert!(settings.password.is_none());
    }

    #[rstest]
    fn unparsable_port_fails_loading() {
        let _guard = lock_env(cleared_except(&[
            ("DB_PASSWORD", "secret"),
            ("DB_PORT", "not-a-port"),
        ]));

        let err = DbSettings::from_environment("db-snapshot").expect_err("bad port");

        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[rstest]
    #[case(DbSettings { port: 0, ..password_only() }, "DB_PORT")]
    #[case(DbSettings { host: Some("  ".to_owned()), ..password_only() }, "DB_HOST")]
    #[case(DbSettings { user: Some(String::new()), ..password_only() }, "DB_USER")]
    #[case(DbSettings { name: Some(" ".to_owned()), ..password_only() }, "DB_NAME")]
    fn unusable_values_name_their_variable(
        #[case] settings: DbSettings,
        #[case] expected_field: &str,
    ) {
        let err = ConnectionParams::from_settings(&settings).expect_err("invalid settings");

        let ConfigError::InvalidValue { field, .. } = err else {
            panic!("expected invalid value, got {err:?}");
        };
        assert_eq!(field, expected_field);
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let settings = password_only();
        let params = ConnectionParams::from_settings(&settings).expect("params resolve");

        assert!(!format!("{settings:?}").contains("hunter2"));
        assert!(!format!("{params:?}").contains("hunter2"));
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.env");

        let err = load_env_file(Some(&path)).expect_err("missing env file");

        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[rstest]
    fn env_file_does_not_override_existing_variables() {
        let _guard = lock_env(cleared_except(&[("DB_HOST", "from-process")]));
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("backend.env");
        fs::write(&path, "DB_HOST=from-file\nDB_PASSWORD=from-file\n").expect("write env file");

        load_env_file(Some(&path)).expect("env file loads");
        let settings = DbSettings::from_environment("db-snapshot").expect("settings load");

        assert_eq!(settings.host(), "from-process");
        assert_eq!(settings.password.as_deref(), Some("from-file"));
    }

    fn password_only() -> DbSettings {
        DbSettings {
            password: Some("hunter2".to_owned()),
            ..DbSettings::default()
        }
    }
}
