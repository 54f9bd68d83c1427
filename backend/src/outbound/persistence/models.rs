//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types re-validates
//! every column.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountDraft, AccountId, AccountName, IdentityKey, Money, Transfer, TransferId,
};

use super::schema::{accounts, transfers};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub name: String,
    pub identity_key: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Convert into a validated domain account.
    pub fn into_account(self) -> Result<Account, String> {
        Ok(Account::new(AccountDraft {
            id: AccountId::new(self.id),
            name: AccountName::new(self.name).map_err(|err| format!("stored name: {err}"))?,
            identity_key: IdentityKey::new(&self.identity_key)
                .map_err(|err| format!("stored identity key: {err}"))?,
            balance: Money::from_stored(self.balance)
                .map_err(|err| format!("stored balance: {err}"))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insertable struct for creating account rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub name: &'a str,
    pub identity_key: &'a str,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Id and balance of a locked account row.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountBalanceRow {
    pub id: i64,
    pub balance: Decimal,
}

/// Row struct for reading from the transfers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transfers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransferRow {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TransferRow {
    /// Convert into a domain transfer record.
    pub fn into_transfer(self) -> Result<Transfer, String> {
        let amount =
            Money::from_stored(self.amount).map_err(|err| format!("stored amount: {err}"))?;
        Ok(Transfer::new(
            TransferId::new(self.id),
            AccountId::new(self.from_account_id),
            AccountId::new(self.to_account_id),
            amount,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating transfer rows.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = transfers)]
pub(crate) struct NewTransferRow {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
