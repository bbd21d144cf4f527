//! Connection settings for the client directory store.
//!
//! # Responsibility
//! - Parse the `{dbname, user, password, host}` settings shape.
//! - Map settings onto an embedded SQLite target.
//!
//! # Invariants
//! - Unknown keys are rejected rather than silently ignored.
//! - `Debug` output never contains the password.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// `dbname` value selecting a private in-memory database.
pub const IN_MEMORY_DBNAME: &str = ":memory:";

/// Errors raised while loading or interpreting connection settings.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    MissingDbName,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
            Self::MissingDbName => write!(f, "`dbname` must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::MissingDbName => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Caller-supplied connection parameters.
///
/// Every key is optional in the input; `dbname` must be non-empty by the time
/// the settings are resolved into a [`DatabaseTarget`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub dbname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Directory holding the database file for the embedded engine.
    #[serde(default)]
    pub host: String,
}

/// Where the embedded engine keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl ConnectionSettings {
    /// Settings for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            dbname: IN_MEMORY_DBNAME.to_string(),
            ..Self::default()
        }
    }

    /// Parses settings from a JSON object.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Resolves the SQLite target: `host/dbname`, bare `dbname`, or memory.
    pub fn target(&self) -> Result<DatabaseTarget, ConfigError> {
        let dbname = self.dbname.trim();
        if dbname.is_empty() {
            return Err(ConfigError::MissingDbName);
        }
        if dbname == IN_MEMORY_DBNAME {
            return Ok(DatabaseTarget::Memory);
        }

        let host = self.host.trim();
        if host.is_empty() {
            Ok(DatabaseTarget::File(PathBuf::from(dbname)))
        } else {
            Ok(DatabaseTarget::File(Path::new(host).join(dbname)))
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() || !self.password.is_empty()
    }
}

impl Debug for ConnectionSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ConnectionSettings")
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &password)
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ConnectionSettings, DatabaseTarget};
    use std::path::PathBuf;

    #[test]
    fn parses_recognized_keys() {
        let settings = ConnectionSettings::from_json_str(
            r#"{"dbname": "clients.db", "user": "app", "password": "s3cret", "host": "/var/lib/clients"}"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.dbname, "clients.db");
        assert_eq!(settings.user, "app");
        assert!(settings.has_credentials());
        assert_eq!(
            settings.target().expect("target should resolve"),
            DatabaseTarget::File(PathBuf::from("/var/lib/clients").join("clients.db"))
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ConnectionSettings::from_json_str(r#"{"dbname": "a.db", "port": 5432}"#)
            .expect_err("unknown key must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_dbname_is_rejected_on_resolve() {
        let settings = ConnectionSettings::from_json_str(r#"{"dbname": "  "}"#).unwrap();
        assert!(matches!(settings.target(), Err(ConfigError::MissingDbName)));
    }

    #[test]
    fn memory_dbname_ignores_host() {
        let settings = ConnectionSettings {
            host: "/tmp".to_string(),
            ..ConnectionSettings::in_memory()
        };
        assert_eq!(settings.target().unwrap(), DatabaseTarget::Memory);
        assert!(!settings.has_credentials());
    }

    #[test]
    fn bare_dbname_is_a_relative_path() {
        let settings = ConnectionSettings::from_json_str(r#"{"dbname": "clients.db"}"#).unwrap();
        assert_eq!(
            settings.target().unwrap(),
            DatabaseTarget::File(PathBuf::from("clients.db"))
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let settings = ConnectionSettings {
            dbname: "clients.db".to_string(),
            password: "hunter2".to_string(),
            ..ConnectionSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
