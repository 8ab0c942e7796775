//! Error types for the vending machine.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for vending machine operations
pub type Result<T> = std::result::Result<T, VendingError>;

/// Errors that can occur while loading or operating the machine.
#[derive(Error, Debug)]
pub enum VendingError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid data file record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Denomination code appears more than once in a ledger
    #[error("Duplicate denomination code {code:?} at entry {ordinal}")]
    DuplicateCode { code: String, ordinal: usize },

    /// Currency file contained a header but no denominations
    #[error("Currency file contains no denominations")]
    NoDenominations,

    /// Face values must be strictly positive
    #[error("Denomination {code:?} has non-positive face value {value}")]
    NonPositiveFaceValue { code: String, value: Money },

    /// Monetary text that cannot be represented with two decimal places
    #[error("Invalid monetary amount {0:?}")]
    InvalidAmount(String),

    /// Ordinal or code that does not resolve to a record
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A unit count of zero where a positive count is required
    #[error("Unit count must be greater than 0")]
    NonPositiveCount,

    /// Change requested for a payment that does not cover the cost
    #[error("Payment {payment} does not cover cost {cost}")]
    InsufficientPayment { payment: Money, cost: Money },

    /// A deposit would overflow a denomination's quantity counter
    #[error("Quantity overflow for denomination {0:?}")]
    QuantityOverflow(String),

    /// Attempted to dispense an item with no stock left
    #[error("Item {0:?} is out of stock")]
    ItemOutOfStock(String),

    /// Wrong command-line arguments
    #[error("Program requires two runtime parameters. Usage: vending-machine <inventory.csv> <currency.csv>")]
    Usage,
}
