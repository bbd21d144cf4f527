//! Client and phone records plus use-case request types.
//!
//! # Responsibility
//! - Define the canonical `Client` / `Phone` rows.
//! - Model "not supplied" vs "supplied" for optional update/search fields.
//! - Enforce column width limits before anything reaches the store.
//!
//! # Invariants
//! - Name, email and search fields treat `None` and `Some("")` the same:
//!   the field is not supplied.
//! - `ClientUpdate::phones` is a real tri-state: `None` leaves phones alone,
//!   `Some(vec![])` clears them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated client identifier.
pub type ClientId = i64;

/// Store-generated phone identifier.
pub type PhoneId = i64;

pub const FIRST_NAME_MAX_CHARS: usize = 50;
pub const LAST_NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 20;

/// One row of `clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: ClientId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// One row of `phones`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub phone_id: PhoneId,
    pub client_id: ClientId,
    pub phone: String,
}

/// One client/phone pairing returned by a search.
///
/// `phone` is `None` for a client without any phone rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMatch {
    pub client_id: ClientId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Validation failures for caller-supplied input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    InvalidClientId(ClientId),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} is {actual_chars} characters long; at most {max_chars} allowed"
            ),
            Self::InvalidClientId(id) => write!(f, "client id must be positive, got {id}"),
        }
    }
}

impl Error for ClientValidationError {}

/// Input for creating a client together with its initial phones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Empty means the client starts without phones.
    pub phones: Vec<String>,
}

impl NewClient {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            phones: Vec::new(),
        }
    }

    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = phones.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ClientValidationError> {
        check_len("first_name", self.first_name.as_deref(), FIRST_NAME_MAX_CHARS)?;
        check_len("last_name", self.last_name.as_deref(), LAST_NAME_MAX_CHARS)?;
        check_len("email", self.email.as_deref(), EMAIL_MAX_CHARS)?;
        for phone in &self.phones {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Partial update of one client.
///
/// Field semantics are deliberately asymmetric:
/// - `first_name`, `last_name`, `email`: `None` or `Some("")` means "leave
///   as-is". A stored value cannot be cleared through this type.
/// - `phones`: `None` leaves phones untouched; `Some(list)` replaces the
///   whole phone set, and `Some(vec![])` removes every phone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: Option<Vec<String>>,
}

impl ClientUpdate {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn replace_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = Some(phones.into_iter().map(Into::into).collect());
        self
    }

    /// Column assignments to apply, in `first_name, last_name, email` order.
    pub fn column_changes(&self) -> Vec<(&'static str, &str)> {
        [
            ("first_name", supplied(&self.first_name)),
            ("last_name", supplied(&self.last_name)),
            ("email", supplied(&self.email)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|value| (column, value)))
        .collect()
    }

    /// Returns `true` when applying this update would not touch any row.
    pub fn is_noop(&self) -> bool {
        self.phones.is_none() && self.column_changes().is_empty()
    }

    pub fn validate(&self) -> Result<(), ClientValidationError> {
        check_len("first_name", supplied(&self.first_name), FIRST_NAME_MAX_CHARS)?;
        check_len("last_name", supplied(&self.last_name), LAST_NAME_MAX_CHARS)?;
        check_len("email", supplied(&self.email), EMAIL_MAX_CHARS)?;
        for phone in self.phones.iter().flatten() {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Equality criteria for client search, AND-combined.
///
/// `None` and `Some("")` both mean "no filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientFilter {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }
}

/// Returns the value when it is present and non-empty.
pub fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

pub fn validate_client_id(id: ClientId) -> Result<(), ClientValidationError> {
    if id <= 0 {
        return Err(ClientValidationError::InvalidClientId(id));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ClientValidationError> {
    check_len("phone", Some(phone), PHONE_MAX_CHARS)
}

fn check_len(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ClientValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ClientValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        supplied, validate_client_id, ClientUpdate, ClientValidationError, NewClient,
        PHONE_MAX_CHARS,
    };

    #[test]
    fn supplied_treats_empty_as_absent() {
        assert_eq!(supplied(&None), None);
        assert_eq!(supplied(&Some(String::new())), None);
        assert_eq!(supplied(&Some(" ".to_string())), Some(" "));
    }

    #[test]
    fn column_changes_skip_empty_fields_in_fixed_order() {
        let update = ClientUpdate::default()
            .email("z@example.com")
            .first_name("")
            .last_name("Zed");

        assert_eq!(
            update.column_changes(),
            vec![("last_name", "Zed"), ("email", "z@example.com")]
        );
    }

    #[test]
    fn empty_phone_list_is_not_a_noop() {
        assert!(ClientUpdate::default().first_name("").is_noop());
        assert!(!ClientUpdate::default()
            .replace_phones(Vec::<String>::new())
            .is_noop());
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let name = "Ю".repeat(50);
        assert!(NewClient::new(name, "B", "a@b.com").validate().is_ok());
    }

    #[test]
    fn overlong_phone_is_rejected() {
        let draft = NewClient::new("A", "B", "a@b.com").with_phones(["1".repeat(21)]);
        assert_eq!(
            draft.validate(),
            Err(ClientValidationError::FieldTooLong {
                field: "phone",
                max_chars: PHONE_MAX_CHARS,
                actual_chars: 21,
            })
        );
    }

    #[test]
    fn skipped_update_fields_are_not_length_checked() {
        let update = ClientUpdate {
            first_name: Some(String::new()),
            ..ClientUpdate::default()
        };
        assert!(update.validate().is_ok());
        assert!(ClientUpdate::default()
            .email("x".repeat(101))
            .validate()
            .is_err());
    }

    #[test]
    fn client_id_must_be_positive() {
        assert!(validate_client_id(1).is_ok());
        assert_eq!(
            validate_client_id(0),
            Err(ClientValidationError::InvalidClientId(0))
        );
    }
}
