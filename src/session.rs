//! Interactive command loop.
//!
//! Reads whitespace-separated integer tokens from any `BufRead`, so the same
//! loop serves a terminal, a piped script, or an in-memory test transcript.
//! End of input ends the session; mid-purchase it abandons the purchase.

use crate::denomination::DenominationRef;
use crate::display;
use crate::error::Result;
use crate::machine::{PurchaseOutcome, VendingMachine};
use log::debug;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Commands selectable from the session menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowCommands,
    DisplayInventory,
    DisplayCurrency,
    Purchase,
    Exit,
}

impl Command {
    /// Maps a menu number to its command.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Command::ShowCommands),
            1 => Some(Command::DisplayInventory),
            2 => Some(Command::DisplayCurrency),
            3 => Some(Command::Purchase),
            -1 => Some(Command::Exit),
            _ => None,
        }
    }
}

/// An interactive session over one machine.
pub struct Session<R, W> {
    input: R,
    output: W,
    machine: VendingMachine,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session reading commands from `input` and writing to `output`.
    pub fn new(machine: VendingMachine, input: R, output: W) -> Self {
        Session {
            input,
            output,
            machine,
            pending: VecDeque::new(),
        }
    }

    /// The machine as left by the commands run so far.
    pub fn machine(&self) -> &VendingMachine {
        &self.machine
    }

    /// Runs the command loop until `-1` or end of input.
    pub fn run(&mut self) -> Result<()> {
        display::write_menu(&mut self.output)?;

        loop {
            let Some(code) = self.prompt_number("\nEnter Command:  ")? else {
                debug!("End of input, leaving session");
                break;
            };
            writeln!(self.output)?;

            match Command::from_code(code) {
                Some(Command::ShowCommands) => display::write_menu(&mut self.output)?,
                Some(Command::DisplayInventory) => {
                    writeln!(self.output, "Inventory: ")?;
                    display::write_inventory(&mut self.output, self.machine.inventory())?;
                }
                Some(Command::DisplayCurrency) => {
                    writeln!(self.output, "Currency: ")?;
                    display::write_currency(&mut self.output, self.machine.ledger())?;
                }
                Some(Command::Purchase) => self.purchase()?,
                Some(Command::Exit) => break,
                None => writeln!(self.output, "Invalid entry.")?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Runs one purchase dialogue.
    fn purchase(&mut self) -> Result<()> {
        let item_count = self.machine.inventory().len();
        if item_count == 0 {
            writeln!(self.output, "No items for sale.")?;
            return Ok(());
        }

        let item = loop {
            let Some(item) = self.prompt_ordinal("Enter Item #:  \n", item_count)? else {
                return Ok(());
            };

            let selected = self.machine.inventory().get(item)?;
            display::write_item(&mut self.output, item, selected)?;
            if self.machine.inventory().is_available(item)? {
                break item;
            }
            writeln!(self.output, "\nItem unavailable!")?;
            writeln!(self.output, "Please choose a different item.\n")?;
        };

        loop {
            let Some(count) = self.prompt_count()? else {
                return Ok(());
            };

            writeln!(self.output, "\nAvailable currency:")?;
            display::write_currency(&mut self.output, self.machine.ledger())?;

            let denomination_count = self.machine.ledger().len();
            let Some(currency) = self.prompt_ordinal("\nEnter Currency #:  \n", denomination_count)?
            else {
                return Ok(());
            };

            let tendered = DenominationRef::Ordinal(currency);
            match self.machine.purchase(item, &tendered, count)? {
                PurchaseOutcome::Completed(receipt) => {
                    writeln!(self.output, "\nItem purchased!\n")?;
                    display::write_change(&mut self.output, &receipt.change)?;
                    return Ok(());
                }
                PurchaseOutcome::InsufficientFunds { .. } => {
                    writeln!(
                        self.output,
                        "\nInsufficient funds. Come back with more money!\n"
                    )?;
                }
                PurchaseOutcome::ExactChangeUnavailable { .. } => {
                    writeln!(
                        self.output,
                        "\nInsufficient currency in machine for exact change. Sorry!"
                    )?;
                    writeln!(self.output, "Please use a smaller currency type.\n")?;
                }
                PurchaseOutcome::ItemUnavailable { .. } => {
                    writeln!(self.output, "\nItem unavailable!")?;
                    return Ok(());
                }
            }
        }
    }

    /// Prompts until a positive count is entered.
    fn prompt_count(&mut self) -> Result<Option<u32>> {
        loop {
            let Some(n) = self.prompt_number("\nHow many currency items?:  ")? else {
                return Ok(None);
            };
            match u32::try_from(n) {
                Ok(count) if count > 0 => return Ok(Some(count)),
                _ => writeln!(self.output, "\nPlease enter an amount greater than 0.")?,
            }
        }
    }

    /// Prompts until a 1-based ordinal in `1..=max` is entered.
    fn prompt_ordinal(&mut self, prompt: &str, max: usize) -> Result<Option<usize>> {
        loop {
            let Some(n) = self.prompt_number(prompt)? else {
                return Ok(None);
            };
            match usize::try_from(n) {
                Ok(ordinal) if (1..=max).contains(&ordinal) => return Ok(Some(ordinal)),
                _ => writeln!(self.output, "\nInvalid entry.\n")?,
            }
        }
    }

    /// Writes `prompt` and reads the next integer token.
    ///
    /// Non-numeric tokens are reported and skipped.
    fn prompt_number(&mut self, prompt: &str) -> Result<Option<i64>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        loop {
            let Some(token) = self.next_token()? else {
                return Ok(None);
            };
            match token.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => {
                    debug!("Ignoring non-numeric input {:?}", token);
                    writeln!(self.output, "Invalid entry.")?;
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}
