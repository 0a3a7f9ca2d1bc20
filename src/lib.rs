// Module declarations
pub mod cli;
pub mod cli_context;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod ledger;
pub mod logging;
pub mod menu;
pub mod mirror;
pub mod models;
pub mod service;
pub mod units;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use config::{load_config, save_config, Config};
pub use error::{FundsError, FundsResult};
pub use ledger::{EvmLedger, FundsLedger, MemoryLedger};
pub use mirror::{AppwriteMirror, DocumentMirror};
pub use models::*;
pub use service::FundsService;
