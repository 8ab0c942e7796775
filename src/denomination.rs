//! Denomination records and the references used to address them.

use crate::error::{Result, VendingError};
use crate::money::Money;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One currency unit held by the machine.
///
/// # Invariants
///
/// - `face_value` is strictly positive (enforced by [`Denomination::new`])
/// - `quantity` is unsigned, so stock can never go negative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    /// Short identifier, unique within a ledger (e.g. `USD`, `Q`).
    pub code: String,

    /// Human-readable label.
    pub display_name: String,

    /// Classification tag such as `coin` or `note`. Informational only.
    pub category: String,

    /// Value of a single unit.
    pub face_value: Money,

    /// Units currently held.
    pub quantity: u32,
}

impl Denomination {
    /// Creates a denomination, rejecting non-positive face values.
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        category: impl Into<String>,
        face_value: Money,
        quantity: u32,
    ) -> Result<Self> {
        let code = code.into();
        if !face_value.is_positive() {
            return Err(VendingError::NonPositiveFaceValue {
                code,
                value: face_value,
            });
        }
        Ok(Denomination {
            code,
            display_name: display_name.into(),
            category: category.into(),
            face_value,
            quantity,
        })
    }

    /// Value of all units currently held.
    pub fn stock_value(&self) -> Money {
        self.face_value.times(self.quantity)
    }
}

/// Stable way of addressing a denomination in a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenominationRef {
    /// 1-based position in ledger order, as shown in the currency listing.
    Ordinal(usize),

    /// Denomination code.
    Code(String),
}

impl fmt::Display for DenominationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenominationRef::Ordinal(n) => write!(f, "currency #{}", n),
            DenominationRef::Code(code) => write!(f, "currency code {:?}", code),
        }
    }
}

impl From<usize> for DenominationRef {
    fn from(ordinal: usize) -> Self {
        DenominationRef::Ordinal(ordinal)
    }
}

impl From<&str> for DenominationRef {
    fn from(code: &str) -> Self {
        DenominationRef::Code(code.to_string())
    }
}

/// Raw denomination row as read from the currency CSV file.
///
/// Monetary and count fields are kept as strings so that parse failures can
/// be reported with the offending row number.
#[derive(Debug, Deserialize)]
pub struct DenominationRecord {
    pub code: String,
    pub name: String,
    pub category: String,
    pub value: String,
    pub quantity: String,
}

impl DenominationRecord {
    /// Validates the raw row and converts it into a [`Denomination`].
    pub fn parse(&self, row: usize) -> Result<Denomination> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(VendingError::InvalidRecord {
                row,
                message: "empty denomination code".to_string(),
            });
        }

        let face_value = Money::from_str(&self.value).map_err(|_| VendingError::InvalidRecord {
            row,
            message: format!("invalid face value {:?}", self.value),
        })?;

        let quantity =
            self.quantity
                .trim()
                .parse::<u32>()
                .map_err(|_| VendingError::InvalidRecord {
                    row,
                    message: format!("invalid quantity {:?}", self.quantity),
                })?;

        Denomination::new(
            code,
            self.name.trim(),
            self.category.trim(),
            face_value,
            quantity,
        )
        .map_err(|e| VendingError::InvalidRecord {
            row,
            message: e.to_string(),
        })
    }
}
