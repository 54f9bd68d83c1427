//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Duplicate identity keys are detected through the unique constraint on
//! `accounts.identity_key`, never by a read before the insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::error;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, NewAccount};

use super::deadline::within;
use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    map_basic_pool_error(error, AccountPersistenceError::connection)
}

fn map_diesel_error(error: &diesel::result::Error) -> AccountPersistenceError {
    map_basic_diesel_error(
        error,
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let id = row.id;
    row.into_account().map_err(|message| {
        error!(account_id = id, %message, "stored account failed validation");
        AccountPersistenceError::query(message)
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(
        &self,
        account: &NewAccount,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let new_row = NewAccountRow {
            name: account.name.as_ref(),
            identity_key: account.identity_key.as_ref(),
            balance: account.balance.as_decimal(),
            created_at: account.created_at,
            updated_at: account.created_at,
        };

        let row = within(
            self.pool.storage_timeout(),
            "insert account",
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::insert_into(accounts::table)
                    .values(&new_row)
                    .returning(AccountRow::as_returning())
                    .get_result::<AccountRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(|err| {
                        if is_unique_violation(&err) {
                            AccountPersistenceError::duplicate_identity(
                                account.identity_key.as_ref(),
                            )
                        } else {
                            map_diesel_error(&err)
                        }
                    })
            },
            AccountPersistenceError::timeout,
        )
        .await?;

        row.map(row_to_account).transpose()
    }

    async fn list_recent_first(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        let rows = within(
            self.pool.storage_timeout(),
            "list accounts",
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                accounts::table
                    .order((accounts::created_at.desc(), accounts::id.desc()))
                    .select(AccountRow::as_select())
                    .load::<AccountRow>(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(&err))
            },
            AccountPersistenceError::timeout,
        )
        .await?;

        rows.into_iter().map(row_to_account).collect()
    }
}
