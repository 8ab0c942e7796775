//! # Vending Machine
//!
//! A vending machine simulator built around a denominated currency ledger
//! that returns exact change with a greedy, largest-denomination-first walk
//! bounded by the units actually on hand.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: money uses 2 decimal places via `rust_decimal`,
//!   so "no change left over" is an exact comparison
//! - **Ordered ledger**: denominations keep load order, which is the greedy
//!   walk's priority
//! - **Check before commit**: feasibility never mutates; only a disbursement
//!   changes quantities
//!
//! ## Example
//!
//! ```
//! use vending_machine::{CurrencyLedger, DenominationRef, Money};
//! use std::io::Cursor;
//!
//! let csv = "code,name,category,value,quantity\n\
//!            Q,Quarter,coin,0.25,4\n\
//!            D,Dime,coin,0.10,5\n";
//! let mut ledger = CurrencyLedger::from_csv(Cursor::new(csv)).unwrap();
//!
//! let tendered = DenominationRef::Code("Q".to_string());
//! let payment = ledger.valuate(&tendered, 4).unwrap();
//! let cost = Money::from_minor_units(65);
//!
//! assert!(ledger.can_make_change(payment, cost));
//! let report = ledger.make_change(&tendered, 4, payment, cost).unwrap();
//! assert_eq!(report.dispensed_value().to_string(), "0.35");
//! ```

pub mod denomination;
pub mod display;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod machine;
pub mod money;
pub mod session;

pub use denomination::{Denomination, DenominationRef};
pub use error::{Result, VendingError};
pub use inventory::{Inventory, Item};
pub use ledger::{ChangeReport, CurrencyLedger, Disbursement};
pub use machine::{PurchaseOutcome, Receipt, VendingMachine};
pub use money::Money;
pub use session::Session;
