//! Purchase orchestration across the inventory and the currency ledger.

use crate::denomination::DenominationRef;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::ledger::{ChangeReport, CurrencyLedger};
use crate::money::Money;
use log::{debug, info};

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub item: String,
    pub price: Money,
    pub payment: Money,
    pub change: ChangeReport,
}

/// What happened to a purchase attempt.
///
/// Only [`PurchaseOutcome::Completed`] changes machine state; every other
/// outcome leaves stock and currency untouched so the customer can retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Completed(Receipt),

    /// The selected item has no stock left.
    ItemUnavailable { item: String },

    /// The tendered currency does not cover the price.
    InsufficientFunds { payment: Money, price: Money },

    /// The machine cannot return exact change for this payment.
    ExactChangeUnavailable { change_due: Money },
}

/// The vending machine: items for sale plus the currency to make change with.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    inventory: Inventory,
    ledger: CurrencyLedger,
}

impl VendingMachine {
    /// Creates a machine from loaded stock.
    pub fn new(inventory: Inventory, ledger: CurrencyLedger) -> Self {
        VendingMachine { inventory, ledger }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    /// Attempts to buy `item` (1-based) with `count` units of `tendered`.
    ///
    /// Bad references and a zero count are errors; an unavailable item,
    /// insufficient funds and infeasible change are outcomes.
    pub fn purchase(
        &mut self,
        item: usize,
        tendered: &DenominationRef,
        count: u32,
    ) -> Result<PurchaseOutcome> {
        let selected = self.inventory.get(item)?;
        let name = selected.name.clone();
        let price = selected.price;

        if !self.inventory.is_available(item)? {
            debug!("Item #{} ({}) is out of stock", item, name);
            return Ok(PurchaseOutcome::ItemUnavailable { item: name });
        }

        let payment = self.ledger.valuate(tendered, count)?;

        if !self.inventory.has_sufficient_funds(payment, item)? {
            debug!("Payment {} does not cover {} for {}", payment, price, name);
            return Ok(PurchaseOutcome::InsufficientFunds { payment, price });
        }

        if !self
            .ledger
            .can_make_change_after_deposit(tendered, count, payment, price)?
        {
            let change_due = payment - price;
            debug!("Cannot return exact change of {} for {}", change_due, name);
            return Ok(PurchaseOutcome::ExactChangeUnavailable { change_due });
        }

        let change = self.ledger.make_change(tendered, count, payment, price)?;
        self.inventory.dispense(item)?;

        info!(
            "Sold {} for {} (paid {}, change {})",
            name, price, payment, change.change_due
        );

        Ok(PurchaseOutcome::Completed(Receipt {
            item: name,
            price,
            payment,
            change,
        }))
    }
}
