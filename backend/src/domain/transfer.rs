//! Transfer data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::AccountId;
use super::money::Money;

/// Store-assigned transfer identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct TransferId(i64);

impl TransferId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of a transfer an account participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Source,
    Destination,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Transfer ready to be applied inside a storage transaction.
///
/// ## Invariants
/// - `from` and `to` differ.
/// - `amount` is strictly positive.
///
/// Built by the transfer engine once the request passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDraft {
    from: AccountId,
    to: AccountId,
    amount: Money,
    at: DateTime<Utc>,
}

impl TransferDraft {
    pub(crate) fn new(from: AccountId, to: AccountId, amount: Money, at: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            amount,
            at,
        }
    }

    pub fn from(&self) -> AccountId {
        self.from
    }

    pub fn to(&self) -> AccountId {
        self.to
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Timestamp shared by both balance updates and the transfer row.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Accounts in the order their row locks must be taken.
    pub fn lock_order(&self) -> [AccountId; 2] {
        if self.from <= self.to {
            [self.from, self.to]
        } else {
            [self.to, self.from]
        }
    }
}

/// Immutable record of a committed balance movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transfer {
    #[schema(value_type = i64, example = 1)]
    id: TransferId,
    #[schema(value_type = i64, example = 1)]
    #[serde(rename = "from_user_id")]
    from_account_id: AccountId,
    #[schema(value_type = i64, example = 2)]
    #[serde(rename = "to_user_id")]
    to_account_id: AccountId,
    #[schema(value_type = f64, example = 40.0)]
    amount: Money,
    created_at: DateTime<Utc>,
}

impl Transfer {
    /// Build a transfer record from persisted components.
    pub fn new(
        id: TransferId,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_account_id,
            to_account_id,
            amount,
            created_at,
        }
    }

    pub fn id(&self) -> TransferId {
        self.id
    }

    pub fn from_account_id(&self) -> AccountId {
        self.from_account_id
    }

    pub fn to_account_id(&self) -> AccountId {
        self.to_account_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid fixture timestamp")
    }

    #[rstest]
    #[case(1, 2, [1, 2])]
    #[case(9, 4, [4, 9])]
    fn lock_order_is_ascending(#[case] from: i64, #[case] to: i64, #[case] expected: [i64; 2]) {
        let draft = TransferDraft::new(
            AccountId::new(from),
            AccountId::new(to),
            Money::positive(dec!(1)).expect("valid amount"),
            at(),
        );

        assert_eq!(draft.lock_order().map(AccountId::get), expected);
    }

    #[test]
    fn transfer_serialises_with_user_field_names() {
        let transfer = Transfer::new(
            TransferId::new(3),
            AccountId::new(1),
            AccountId::new(2),
            Money::positive(dec!(40)).expect("valid amount"),
            at(),
        );

        let value = serde_json::to_value(&transfer).expect("serialise transfer");
        assert_eq!(
            value,
            json!({
                "id": 3,
                "from_user_id": 1,
                "to_user_id": 2,
                "amount": 40.0,
                "created_at": "2025-01-02T03:04:05Z"
            })
        );
    }
}
