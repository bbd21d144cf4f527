//! Client directory facade.
//!
//! # Responsibility
//! - Provide the stable entry points for schema setup and client CRUD.
//! - Emit one metadata-only log event per operation outcome.
//!
//! # Invariants
//! - Repository errors are returned unchanged; nothing is retried.
//! - Names, emails and phone numbers never appear in log lines.

use crate::model::client::{
    Client, ClientFilter, ClientId, ClientMatch, ClientUpdate, NewClient, Phone, PhoneId,
};
use crate::repo::client_repo::{ClientRepository, RepoResult};
use log::{debug, error, info};
use std::time::Instant;

/// Data-access facade over clients and their phones.
pub struct ClientDirectory<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientDirectory<R> {
    /// Creates a directory using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates the `clients` and `phones` tables when absent.
    ///
    /// Safe to call on every startup.
    pub fn ensure_schema(&self) -> RepoResult<()> {
        self.observe("schema_ensure", String::new(), |repo| repo.ensure_schema())
    }

    /// Inserts a client and its initial phones in one transaction.
    ///
    /// Returns the store-generated client id.
    pub fn add_client(&self, client: &NewClient) -> RepoResult<ClientId> {
        let fields = format!("phones={}", client.phones.len());
        let client_id = self.observe("client_add", fields, |repo| repo.add_client(client))?;
        debug!("event=client_add module=directory status=created client_id={client_id}");
        Ok(client_id)
    }

    /// Adds one phone to an existing client.
    ///
    /// # Errors
    /// - `RepoError::MalformedInput` when `client_id <= 0` or the number is
    ///   too long; nothing reaches the store in that case.
    /// - `RepoError::ConstraintViolation` when a positive `client_id` does
    ///   not exist.
    pub fn add_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId> {
        self.observe("phone_add", format!("client_id={client_id}"), |repo| {
            repo.add_phone(client_id, phone)
        })
    }

    /// Applies a partial update; see [`ClientUpdate`] for field semantics.
    pub fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> RepoResult<()> {
        let fields = format!(
            "client_id={client_id} columns={} replace_phones={}",
            update.column_changes().len(),
            update.phones.is_some()
        );
        self.observe("client_update", fields, |repo| {
            repo.update_client(client_id, update)
        })
    }

    /// Deletes every matching phone of the client; returns how many went.
    pub fn delete_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        self.observe("phone_delete", format!("client_id={client_id}"), |repo| {
            repo.delete_phone(client_id, phone)
        })
    }

    /// Deletes the client and, through the cascade rule, all its phones.
    pub fn delete_client(&self, client_id: ClientId) -> RepoResult<bool> {
        self.observe("client_delete", format!("client_id={client_id}"), |repo| {
            repo.delete_client(client_id)
        })
    }

    /// Searches clients joined with their phones.
    ///
    /// Clients without phones appear once with `phone = None` unless a phone
    /// criterion is supplied.
    pub fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientMatch>> {
        let matches = self.observe("client_find", String::new(), |repo| {
            repo.find_clients(filter)
        })?;
        debug!(
            "event=client_find module=directory status=rows count={}",
            matches.len()
        );
        Ok(matches)
    }

    /// Loads one client row, or `None` when the id is unknown.
    pub fn get_client(&self, client_id: ClientId) -> RepoResult<Option<Client>> {
        self.observe("client_get", format!("client_id={client_id}"), |repo| {
            repo.get_client(client_id)
        })
    }

    /// Lists a client's phones in insertion order.
    pub fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<Phone>> {
        self.observe("phone_list", format!("client_id={client_id}"), |repo| {
            repo.list_phones(client_id)
        })
    }

    fn observe<T>(
        &self,
        event: &'static str,
        fields: String,
        op: impl FnOnce(&R) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let separator = if fields.is_empty() { "" } else { " " };

        match op(&self.repo) {
            Ok(value) => {
                info!(
                    "event={event} module=directory status=ok{separator}{fields} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={event} module=directory status=error{separator}{fields} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
