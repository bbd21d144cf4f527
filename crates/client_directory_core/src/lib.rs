//! Client directory core: clients, their phone numbers, and the SQLite
//! data-access layer that stores them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ConnectionSettings, DatabaseTarget};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::client::{
    Client, ClientFilter, ClientId, ClientMatch, ClientUpdate, ClientValidationError, NewClient,
    Phone, PhoneId,
};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};
pub use service::client_directory::ClientDirectory;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
