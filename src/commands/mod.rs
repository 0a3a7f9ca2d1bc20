pub mod config;
pub mod contractors;
pub mod expenses;
pub mod menu;
pub mod mirror;
pub mod projects;
pub mod roles;
pub mod whoami;

use clap::ArgMatches;
use colored::*;

use crate::error::{FundsError, FundsResult};
use crate::ledger::TxReceipt;

pub(crate) fn required<'a>(matches: &'a ArgMatches, name: &str) -> FundsResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| FundsError::InvalidInput(format!("Missing argument '{}'", name)))
}

pub(crate) fn print_receipt(message: &str, receipt: &TxReceipt) {
    println!("{} {}", "✅".green(), message.green().bold());
    println!("{}: {}", "Transaction".bold(), receipt.tx_hash.to_string().bright_black());
}
