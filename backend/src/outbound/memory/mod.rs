//! In-process ledger store.
//!
//! Used when no database URL is configured and by the HTTP test suites. All
//! ledger state sits behind one async mutex. A transfer runs its stages on a
//! staged copy of the state; the copy replaces the live state only when every
//! stage succeeded, so an abort leaves balances and the transfer log as they
//! were.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, LedgerAccount, TransferAbort, TransferLedger,
    TransferPersistenceError, TransferRepository,
};
use crate::domain::{
    Account, AccountDraft, AccountId, AccountName, IdentityKey, Money, NewAccount, Transfer,
    TransferDraft, TransferId, apply_transfer_stages,
};

#[derive(Debug, Clone)]
struct StoredAccount {
    name: AccountName,
    identity_key: IdentityKey,
    balance: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredAccount {
    fn to_account(&self, id: AccountId) -> Account {
        Account::new(AccountDraft {
            id,
            name: self.name.clone(),
            identity_key: self.identity_key.clone(),
            balance: self.balance,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    accounts: BTreeMap<AccountId, StoredAccount>,
    transfers: Vec<Transfer>,
    last_account_id: i64,
    last_transfer_id: i64,
    #[cfg(any(test, feature = "test-support"))]
    fail_transfer_inserts: bool,
}

#[async_trait]
impl TransferLedger for LedgerState {
    async fn lock_account(
        &mut self,
        id: AccountId,
    ) -> Result<Option<LedgerAccount>, TransferPersistenceError> {
        Ok(self.accounts.get(&id).map(|stored| LedgerAccount {
            id,
            balance: stored.balance,
        }))
    }

    async fn debit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError> {
        let Some(stored) = self.accounts.get_mut(&id) else {
            return Ok(false);
        };
        let Some(remaining) = stored.balance.checked_debit(amount) else {
            return Ok(false);
        };
        stored.balance = remaining;
        stored.updated_at = at;
        Ok(true)
    }

    async fn credit(
        &mut self,
        id: AccountId,
        amount: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, TransferPersistenceError> {
        let Some(stored) = self.accounts.get_mut(&id) else {
            return Ok(false);
        };
        stored.balance = stored.balance.checked_credit(amount).ok_or_else(|| {
            TransferPersistenceError::query("credited balance exceeds the storable range")
        })?;
        stored.updated_at = at;
        Ok(true)
    }

    async fn record_transfer(
        &mut self,
        draft: &TransferDraft,
    ) -> Result<Option<Transfer>, TransferPersistenceError> {
        #[cfg(any(test, feature = "test-support"))]
        if self.fail_transfer_inserts {
            return Err(TransferPersistenceError::query("database error"));
        }
        self.last_transfer_id += 1;
        let transfer = Transfer::new(
            TransferId::new(self.last_transfer_id),
            draft.from(),
            draft.to(),
            draft.amount(),
            draft.at(),
        );
        self.transfers.push(transfer.clone());
        Ok(Some(transfer))
    }
}

/// Ledger store kept in process memory.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed transfers in insertion order.
    pub async fn transfer_log(&self) -> Vec<Transfer> {
        self.state.lock().await.transfers.clone()
    }

    /// Make every subsequent transfer insert fail, as a broken store would.
    #[cfg(any(test, feature = "test-support"))]
    pub async fn fail_transfer_inserts(&self, fail: bool) {
        self.state.lock().await.fail_transfer_inserts = fail;
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedgerStore {
    async fn insert(
        &self,
        account: &NewAccount,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut state = self.state.lock().await;
        let taken = state
            .accounts
            .values()
            .any(|stored| stored.identity_key == account.identity_key);
        if taken {
            return Err(AccountPersistenceError::duplicate_identity(
                account.identity_key.as_ref(),
            ));
        }

        state.last_account_id += 1;
        let id = AccountId::new(state.last_account_id);
        let stored = StoredAccount {
            name: account.name.clone(),
            identity_key: account.identity_key.clone(),
            balance: account.balance,
            created_at: account.created_at,
            updated_at: account.created_at,
        };
        let created = stored.to_account(id);
        state.accounts.insert(id, stored);
        Ok(Some(created))
    }

    async fn list_recent_first(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .iter()
            .map(|(id, stored)| stored.to_account(*id))
            .collect();
        accounts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(accounts)
    }
}

#[async_trait]
impl TransferRepository for InMemoryLedgerStore {
    async fn apply(&self, draft: &TransferDraft) -> Result<Transfer, TransferAbort> {
        let mut state = self.state.lock().await;
        let mut staged = state.clone();
        let transfer = apply_transfer_stages(&mut staged, draft).await?;
        *state = staged;
        debug!(transfer_id = %transfer.id(), "in-memory transfer committed");
        Ok(transfer)
    }
}
