//! PostgreSQL-backed `TransferRepository` implementation using Diesel ORM.
//!
//! One transfer is one database transaction. Account rows are read with
//! `SELECT … FOR UPDATE` in the order chosen by the transfer stages, and the
//! debit is a conditional update whose affected-row count is checked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    LedgerAccount, TransferAbort, TransferLedger, TransferPersistenceError, TransferRepository,
};
use crate::domain::{AccountId, Money, Transfer, TransferDraft, apply_transfer_stages};

use super::deadline::within;
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountBalanceRow, NewTransferRow, TransferRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, transfers};

/// Diesel-backed implementation of the transfer repository port.
#[derive(Clone)]
pub struct DieselTransferRepository {
    pool: DbPool,
}

impl DieselTransferRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TransferPersistenceError {
    map_basic_pool_error(error, TransferPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TransferPersistenceError {
    map_basic_diesel_error(
        &error,
        TransferPersistenceError::query,
        TransferPersistenceError::connection,
    )
}

/// Transaction outcome: a staged abort, or a failure of `BEGIN`/`COMMIT`.
#[derive(Debug)]
enum TxError {
    Abort(TransferAbort),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// [`TransferLedger`] over one open PostgreSQL transaction.
struct PgTransferLedger<'a> {
    conn: &'a mut AsyncPgConnection,
}

#[async_trait]
impl TransferLedger for PgTransferLedger<'_> {
    async fn lock_account(
        &mut self,
        id: AccountId,
    ) -> Result<Option<LedgerAccount>, TransferPersistenceError> {
        let row = accounts::table
            .find(id.get())
            .select(AccountBalanceRow::as_select())
            .for_update()
            .get_result::<AccountBalanceRow>(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Money::from_stored(row.balance)
                .map(|balance| LedgerAccount {
                    id: AccountId::new(row.id),
                    balance,
                })
                .map_err(|err| TransferPersistenceError::query(format!("stored balance: {err}")))
        })
        .transpose()
    }

    async fn debit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError> {
        let amount = amount.as_decimal();
        let updated = diesel::update(
            accounts::table
                .filter(accounts::id.eq(id.get()))
                .filter(accounts::balance.ge(amount)),
        )
        .set((
            accounts::balance.eq(accounts::balance - amount),
            accounts::updated_at.eq(at),
        ))
        .execute(&mut *self.conn)
        .await
        .map_err(map_diesel_error)?;

        debug!(account_id = %id, updated, "conditional debit applied");
        Ok(updated == 1)
    }

    async fn credit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError> {
        let amount = amount.as_decimal();
        let updated = diesel::update(accounts::table.filter(accounts::id.eq(id.get())))
            .set((
                accounts::balance.eq(accounts::balance + amount),
                accounts::updated_at.eq(at),
            ))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated == 1)
    }

    async fn record_transfer(
        &mut self,
        draft: &TransferDraft,
    ) -> Result<Option<Transfer>, TransferPersistenceError> {
        let new_row = NewTransferRow {
            from_account_id: draft.from().get(),
            to_account_id: draft.to().get(),
            amount: draft.amount().as_decimal(),
            created_at: draft.at(),
        };

        let row = diesel::insert_into(transfers::table)
            .values(&new_row)
            .returning(TransferRow::as_returning())
            .get_result::<TransferRow>(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TransferRow::into_transfer)
            .transpose()
            .map_err(TransferPersistenceError::query)
    }
}

#[async_trait]
impl TransferRepository for DieselTransferRepository {
    async fn apply(&self, draft: &TransferDraft) -> Result<Transfer, TransferAbort> {
        within(
            self.pool.storage_timeout(),
            "apply transfer",
            async {
                let mut conn = self
                    .pool
                    .get()
                    .await
                    .map_err(|err| TransferAbort::Storage(map_pool_error(err)))?;

                conn.transaction::<Transfer, TxError, _>(|conn| {
                    async move {
                        let mut ledger = PgTransferLedger { conn };
                        apply_transfer_stages(&mut ledger, draft)
                            .await
                            .map_err(TxError::Abort)
                    }
                    .scope_boxed()
                })
                .await
                .map_err(|err| match err {
                    TxError::Abort(abort) => abort,
                    TxError::Diesel(error) => TransferAbort::Commit(map_diesel_error(error)),
                })
            },
            |message| TransferAbort::Storage(TransferPersistenceError::timeout(message)),
        )
        .await
    }
}
