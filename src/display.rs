//! Text rendering of machine state for the interactive session.

use crate::inventory::{Inventory, Item};
use crate::ledger::{ChangeReport, CurrencyLedger};
use std::io::{self, Write};

/// Writes the command menu.
pub fn write_menu<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Show Commands:      0")?;
    writeln!(out, "Display Inventory:  1")?;
    writeln!(out, "Display Currency:   2")?;
    writeln!(out, "Purchase Item:      3")?;
    writeln!(out, "Exit:              -1")?;
    writeln!(out)
}

/// Writes the inventory as a numbered table.
pub fn write_inventory<W: Write>(mut out: W, inventory: &Inventory) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{:>6}  {:<18}{:>10}  {:<10}{:>10}",
        "Item #", "Name", "Price", "Container", "Quantity"
    )?;
    for (index, item) in inventory.items().iter().enumerate() {
        writeln!(
            out,
            "{:>5}.  {:<18}{:>10}  {:<10}{:>10}",
            index + 1,
            item.name,
            item.price.to_string(),
            item.container,
            item.quantity
        )?;
    }
    Ok(())
}

/// Writes the currency stock as a numbered table.
pub fn write_currency<W: Write>(mut out: W, ledger: &CurrencyLedger) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{:>10}  {:<8}{:<20}{:<10}{:>10}{:>10}",
        "Currency #", "Code", "Name", "Type", "Value", "Quantity"
    )?;
    for (index, denom) in ledger.denominations().iter().enumerate() {
        writeln!(
            out,
            "{:>9}.  {:<8}{:<20}{:<10}{:>10}{:>10}",
            index + 1,
            denom.code,
            denom.display_name,
            denom.category,
            denom.face_value.to_string(),
            denom.quantity
        )?;
    }
    Ok(())
}

/// Writes a one-item summary.
pub fn write_item<W: Write>(mut out: W, ordinal: usize, item: &Item) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Item #: {}", ordinal)?;
    writeln!(
        out,
        "Name: {}    Price: {}    Container: {}    Quantity: {} in stock",
        item.name, item.price, item.container, item.quantity
    )
}

/// Writes the change amount and one line per dispensed denomination.
pub fn write_change<W: Write>(mut out: W, report: &ChangeReport) -> io::Result<()> {
    writeln!(out, "Change amount: {}", report.change_due)?;
    for d in &report.dispensed {
        writeln!(
            out,
            "Change: {} x {} ({} {})",
            d.units, d.display_name, d.code, d.face_value
        )?;
    }
    Ok(())
}
