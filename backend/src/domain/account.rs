//! Account data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::{Money, MoneyValidationError};

/// Maximum allowed length for an account name.
pub const ACCOUNT_NAME_MAX: usize = 100;

/// Validation errors returned by account constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("balance is invalid: {0}")]
    Balance(#[from] MoneyValidationError),
}

impl AccountValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::Balance(_) => "balance",
        }
    }
}

/// Store-assigned account identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of an account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Validate and construct an [`AccountName`].
    pub fn new(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if name.chars().count() > ACCOUNT_NAME_MAX {
            return Err(AccountValidationError::NameTooLong {
                max: ACCOUNT_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Local part, a single @, and a dotted domain with an alphabetic TLD.
        let pattern = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique identity key of an account (an email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Validate and construct an [`IdentityKey`].
    ///
    /// Surrounding whitespace is trimmed and the domain is lowercased, so
    /// `a@X.com` and `a@x.com` name the same account. The local part keeps
    /// its case.
    pub fn new(email: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if !email_regex().is_match(email) {
            return Err(AccountValidationError::InvalidEmail);
        }
        let Some((local, domain)) = email.rsplit_once('@') else {
            return Err(AccountValidationError::InvalidEmail);
        };
        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IdentityKey> for String {
    fn from(value: IdentityKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for IdentityKey {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: AccountName,
    pub identity_key: IdentityKey,
    pub initial_balance: Money,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        name: impl Into<String>,
        email: impl AsRef<str>,
        balance: Decimal,
    ) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: AccountName::new(name)?,
            identity_key: IdentityKey::new(email)?,
            initial_balance: Money::non_negative(balance)?,
        })
    }
}

/// Row handed to the store when registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: AccountName,
    pub identity_key: IdentityKey,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

/// Persisted account.
///
/// ## Invariants
/// - `balance` is never negative.
/// - `identity_key` is unique across all accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    #[schema(value_type = i64, example = 1)]
    id: AccountId,
    #[schema(value_type = String, example = "Alice")]
    name: AccountName,
    #[schema(value_type = String, example = "alice@example.com")]
    #[serde(rename = "email")]
    identity_key: IdentityKey,
    #[schema(value_type = f64, example = 100.0)]
    balance: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field set used to build an [`Account`].
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub id: AccountId,
    pub name: AccountName,
    pub identity_key: IdentityKey,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build an account from validated components.
    pub fn new(draft: AccountDraft) -> Self {
        let AccountDraft {
            id,
            name,
            identity_key,
            balance,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            name,
            identity_key,
            balance,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn identity_key(&self) -> &IdentityKey {
        &self.identity_key
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
