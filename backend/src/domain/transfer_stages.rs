//! Staged checks and mutations of one transfer inside an open transaction.
//!
//! Row locks are taken in ascending account-id order so two opposing
//! transfers never wait on each other, while failures are still reported in
//! stage order: source first, then destination, then commit.

use tracing::debug;

use super::ports::{LedgerAccount, TransferAbort, TransferLedger};
use super::{AccountId, AccountRole, Transfer, TransferDraft};

/// Apply `draft` through `ledger`.
///
/// The caller owns the transaction: it commits on `Ok` and rolls back on any
/// [`TransferAbort`].
pub async fn apply_transfer_stages<L>(
    ledger: &mut L,
    draft: &TransferDraft,
) -> Result<Transfer, TransferAbort>
where
    L: TransferLedger + ?Sized,
{
    let [first, second] = draft.lock_order();
    let first_row = ledger
        .lock_account(first)
        .await
        .map_err(TransferAbort::Storage)?;
    let second_row = ledger
        .lock_account(second)
        .await
        .map_err(TransferAbort::Storage)?;
    let locked = |id: AccountId| -> Option<LedgerAccount> {
        [first_row, second_row]
            .into_iter()
            .flatten()
            .find(|row| row.id == id)
    };

    let source = locked(draft.from()).ok_or(TransferAbort::AccountMissing {
        role: AccountRole::Source,
        id: draft.from(),
    })?;
    if source.balance < draft.amount() {
        debug!(account_id = %source.id, balance = %source.balance, "source balance too low");
        return Err(TransferAbort::InsufficientFunds);
    }

    if locked(draft.to()).is_none() {
        return Err(TransferAbort::AccountMissing {
            role: AccountRole::Destination,
            id: draft.to(),
        });
    }

    let debited = ledger
        .debit(draft.from(), draft.amount(), draft.at())
        .await
        .map_err(TransferAbort::Commit)?;
    if !debited {
        return Err(TransferAbort::InsufficientFunds);
    }

    let credited = ledger
        .credit(draft.to(), draft.amount(), draft.at())
        .await
        .map_err(TransferAbort::Commit)?;
    if !credited {
        return Err(TransferAbort::AccountMissing {
            role: AccountRole::Destination,
            id: draft.to(),
        });
    }

    ledger
        .record_transfer(draft)
        .await
        .map_err(TransferAbort::Commit)?
        .ok_or(TransferAbort::MissingRecord)
}
