use clap::ArgMatches;
use colored::*;

use super::required;
use crate::config::{config_path, load_config, load_effective_config, save_config};
use crate::error::FundsResult;

pub async fn handle_config(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_config_impl(matches).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

fn handle_config_impl(matches: &ArgMatches) -> FundsResult<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            let config = load_effective_config()?;
            for (key, value) in config.display_entries() {
                match value {
                    Some(value) => println!("{:<24} {}", key.bold(), value),
                    None => println!("{:<24} {}", key.bold(), "(not set)".dimmed()),
                }
            }
        }
        Some(("set", set_matches)) => {
            let key = required(set_matches, "key")?;
            let value = required(set_matches, "value")?;

            // Only the file layer is saved; env overrides stay out of it
            let mut config = load_config()?;
            config.set(key, value)?;
            save_config(&config)?;
            println!("{} {} saved", "✅".green(), key.bold());
        }
        Some(("path", _)) => {
            println!("{}", config_path()?.display());
        }
        _ => println!("Usage: infra-funds config <show|set|path>"),
    }
    Ok(())
}
