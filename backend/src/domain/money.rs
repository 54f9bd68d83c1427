//! Fixed-point monetary amounts.

use std::fmt;
use std::ops::Sub;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits a [`Money`] value may carry.
pub const MONEY_SCALE: u32 = 4;

/// Largest amount a `NUMERIC(20, 4)` column holds: sixteen integer digits.
pub const MONEY_MAX: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 4);

/// Validation errors returned by [`Money`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyValidationError {
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount must have at most {max} decimal places")]
    TooPrecise { max: u32 },
    #[error("amount must not exceed {max}")]
    TooLarge { max: Decimal },
}

/// Non-negative monetary amount with at most [`MONEY_SCALE`] decimal places.
///
/// Serialises as a JSON number.
///
/// # Examples
/// ```
/// use ledger::domain::Money;
/// use rust_decimal::Decimal;
///
/// let amount = Money::non_negative(Decimal::new(1050, 2)).expect("valid amount");
/// assert_eq!(amount.to_string(), "10.50");
/// assert!(Money::positive(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Zero balance.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate an amount usable as a balance (`>= 0`).
    pub fn non_negative(value: Decimal) -> Result<Self, MoneyValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyValidationError::Negative);
        }
        Self::check_scale(value)
    }

    /// Validate an amount usable as a transfer amount (`> 0`).
    pub fn positive(value: Decimal) -> Result<Self, MoneyValidationError> {
        if value <= Decimal::ZERO {
            return Err(MoneyValidationError::NotPositive);
        }
        Self::check_scale(value)
    }

    fn check_scale(value: Decimal) -> Result<Self, MoneyValidationError> {
        if value > MONEY_MAX {
            return Err(MoneyValidationError::TooLarge { max: MONEY_MAX });
        }
        if value.normalize().scale() > MONEY_SCALE {
            return Err(MoneyValidationError::TooPrecise { max: MONEY_SCALE });
        }
        Ok(Self(value))
    }

    /// Wrap a value read back from the store.
    ///
    /// Storage columns enforce the scale and sign constraints, so this only
    /// rejects negative values that would indicate a corrupted row.
    pub fn from_stored(value: Decimal) -> Result<Self, MoneyValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyValidationError::Negative);
        }
        Ok(Self(value))
    }

    /// Underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Subtract `amount`, returning `None` when the result would be negative.
    pub fn checked_debit(self, amount: Money) -> Option<Money> {
        (self.0 >= amount.0).then(|| Self(self.0 - amount.0))
    }

    /// Add `amount`, returning `None` when the result would exceed [`MONEY_MAX`].
    pub fn checked_credit(self, amount: Money) -> Option<Money> {
        self.0
            .checked_add(amount.0)
            .filter(|sum| *sum <= MONEY_MAX)
            .map(Self)
    }
}

impl Sub for Money {
    type Output = Decimal;

    /// Differences may be negative, so they leave the `Money` type.
    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
