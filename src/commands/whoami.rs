use clap::ArgMatches;
use colored::*;

use crate::cli_context::CliContext;
use crate::error::FundsResult;

pub async fn handle_whoami(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_whoami_impl(matches).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

fn handle_whoami_impl(matches: &ArgMatches) -> FundsResult<()> {
    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;
    let config = context.config();

    println!("Signing as: {}", service.signer().to_checksum(None).bold());
    println!("Government: {}", service.government().to_checksum(None));
    if context.is_simulated() {
        println!("Ledger: {}", "in-memory simulation".yellow());
    } else {
        println!("Network: {}", config.network());
        println!("Contract: {}", config.contract_address()?.to_checksum(None));
    }
    println!(
        "Document store: {}",
        if service.has_mirror() {
            "configured".green()
        } else {
            "not configured".dimmed()
        }
    );

    Ok(())
}
