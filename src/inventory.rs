//! Item stock and pricing.

use crate::error::{Result, VendingError};
use crate::money::Money;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// A product the machine sells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub price: Money,
    /// Packaging, e.g. `can` or `bottle`.
    pub container: String,
    pub quantity: u32,
}

/// Raw item row as read from the inventory CSV file.
#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub price: String,
    pub container: String,
    pub quantity: String,
}

impl ItemRecord {
    /// Validates the raw row and converts it into an [`Item`].
    pub fn parse(&self, row: usize) -> Result<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(VendingError::InvalidRecord {
                row,
                message: "empty item name".to_string(),
            });
        }

        let price = Money::from_str(&self.price).map_err(|_| VendingError::InvalidRecord {
            row,
            message: format!("invalid price {:?}", self.price),
        })?;
        if price < Money::ZERO {
            return Err(VendingError::InvalidRecord {
                row,
                message: format!("negative price {}", price),
            });
        }

        let quantity =
            self.quantity
                .trim()
                .parse::<u32>()
                .map_err(|_| VendingError::InvalidRecord {
                    row,
                    message: format!("invalid quantity {:?}", self.quantity),
                })?;

        Ok(Item {
            name: name.to_string(),
            price,
            container: self.container.trim().to_string(),
            quantity,
        })
    }
}

/// Items in listing order, addressed by 1-based ordinal.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Creates an inventory from items in listing order.
    pub fn new(items: Vec<Item>) -> Self {
        Inventory { items }
    }

    /// Loads items from CSV with header `name,price,container,quantity`.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut items = Vec::new();
        for (row_idx, result) in csv_reader.deserialize::<ItemRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            let record = result.map_err(|e| VendingError::InvalidRecord {
                row: row_num,
                message: e.to_string(),
            })?;
            let item = record.parse(row_num)?;
            debug!(
                "Row {}: Loaded item {} at {} ({} in stock)",
                row_num, item.name, item.price, item.quantity
            );
            items.push(item);
        }

        Ok(Inventory { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, item: usize) -> Result<usize> {
        item.checked_sub(1)
            .filter(|index| *index < self.items.len())
            .ok_or_else(|| VendingError::InvalidReference(format!("item #{}", item)))
    }

    /// Looks up an item by 1-based ordinal.
    pub fn get(&self, item: usize) -> Result<&Item> {
        let index = self.index_of(item)?;
        Ok(&self.items[index])
    }

    /// Returns `true` if at least one unit is in stock.
    pub fn is_available(&self, item: usize) -> Result<bool> {
        Ok(self.get(item)?.quantity > 0)
    }

    /// Returns `true` if `payment` covers the item's price.
    pub fn has_sufficient_funds(&self, payment: Money, item: usize) -> Result<bool> {
        Ok(payment >= self.get(item)?.price)
    }

    /// Removes one unit of the item from stock.
    pub fn dispense(&mut self, item: usize) -> Result<()> {
        let index = self.index_of(item)?;
        let entry = &mut self.items[index];
        if entry.quantity == 0 {
            return Err(VendingError::ItemOutOfStock(entry.name.clone()));
        }
        entry.quantity -= 1;
        Ok(())
    }
}
