//! Vending Machine CLI
//!
//! Loads an inventory file and a currency file, then runs the interactive
//! command loop over stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- inventory.csv currency.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;
use vending_machine::{CurrencyLedger, Inventory, Result, Session, VendingError, VendingMachine};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        return Err(VendingError::Usage);
    }

    let inventory = Inventory::from_csv(BufReader::new(File::open(&args[1])?))?;
    let ledger = CurrencyLedger::from_csv(BufReader::new(File::open(&args[2])?))?;
    let machine = VendingMachine::new(inventory, ledger);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "\nVending machine simulator\n")?;

    let stdin = io::stdin();
    let mut session = Session::new(machine, stdin.lock(), handle);
    session.run()
}
