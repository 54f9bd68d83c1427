//! Transfer engine service.
//!
//! Validation happens here before any storage access; the staged checks and
//! mutations run inside the repository's transaction via
//! [`apply_transfer_stages`](crate::domain::apply_transfer_stages).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{TransferAbort, TransferEngine, TransferRepository, TransferRequest};
use crate::domain::{LedgerError, Money, Transfer, TransferDraft};

fn map_abort(abort: TransferAbort) -> LedgerError {
    match abort {
        TransferAbort::AccountMissing { role, id } => LedgerError::AccountNotFound { role, id },
        TransferAbort::InsufficientFunds => LedgerError::InsufficientFunds,
        TransferAbort::Commit(cause) => {
            error!(error = %cause, "transfer rolled back");
            LedgerError::transfer_failed(cause.cause())
        }
        TransferAbort::Storage(cause) => {
            error!(error = %cause, "transfer storage failure");
            LedgerError::storage_failure(cause.to_string())
        }
        TransferAbort::MissingRecord => {
            error!("transfer row missing after insert");
            LedgerError::storage_failure("transfer row missing after insert")
        }
    }
}

/// Transfer engine backed by a [`TransferRepository`].
#[derive(Clone)]
pub struct TransferService<R> {
    transfers: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TransferService<R> {
    /// Create an engine over `transfers`, reading timestamps from `clock`.
    pub fn new(transfers: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { transfers, clock }
    }

    fn validate(&self, request: TransferRequest) -> Result<TransferDraft, LedgerError> {
        if request.from == request.to {
            return Err(LedgerError::SelfTransfer);
        }
        let amount = Money::positive(request.amount).map_err(LedgerError::InvalidAmount)?;
        Ok(TransferDraft::new(
            request.from,
            request.to,
            amount,
            self.clock.utc().trunc_subsecs(6),
        ))
    }
}

#[async_trait]
impl<R> TransferEngine for TransferService<R>
where
    R: TransferRepository,
{
    async fn transfer(&self, request: TransferRequest) -> Result<Transfer, LedgerError> {
        let draft = self.validate(request)?;
        let transfer = self.transfers.apply(&draft).await.map_err(|abort| {
            warn!(
                from = %draft.from(),
                to = %draft.to(),
                amount = %draft.amount(),
                reason = %abort,
                "transfer rejected"
            );
            map_abort(abort)
        })?;

        info!(
            transfer_id = %transfer.id(),
            from = %transfer.from_account_id(),
            to = %transfer.to_account_id(),
            amount = %transfer.amount(),
            "transfer committed"
        );
        Ok(transfer)
    }
}

#[cfg(test)]
#[path = "transfer_service_tests.rs"]
mod tests;
