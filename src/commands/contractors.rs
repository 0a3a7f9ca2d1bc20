use clap::ArgMatches;
use colored::*;

use super::{print_receipt, required};
use crate::cli_context::CliContext;
use crate::error::FundsResult;
use crate::formatting::{print_contractors, OutputFormat};
use crate::service::{parse_id, ContractorRef};

pub async fn handle_contractors(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_contractors_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_contractors_impl(matches: &ArgMatches) -> FundsResult<()> {
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("simple")
        .parse()?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let contractors = service.list_contractors().await?;
    print_contractors(&contractors, format)
}

pub async fn handle_create_contractor(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_create_contractor_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_create_contractor_impl(matches: &ArgMatches) -> FundsResult<()> {
    let name = required(matches, "name")?;
    let wallet = required(matches, "wallet")?;
    let services = required(matches, "services")?;
    let description = required(matches, "description")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let created = service.create_contractor(name, services, description, wallet).await?;
    print_receipt("Contractor created successfully!", &created.receipt);
    if let Some(id) = created.id {
        println!("{}: {}", "ID".bold(), id.to_string().bright_blue().bold());
    }
    println!("{}: {}", "Name".bold(), name.trim());
    Ok(())
}

pub async fn handle_assign(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_assign_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_assign_impl(matches: &ArgMatches) -> FundsResult<()> {
    let project = parse_id(required(matches, "project")?, "project")?;
    let contractor: ContractorRef = required(matches, "contractor")?.parse()?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let receipt = service.assign_contractor(project, contractor).await?;
    print_receipt("Contractor assigned to project successfully.", &receipt);
    Ok(())
}

pub async fn handle_pay(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_pay_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_pay_impl(matches: &ArgMatches) -> FundsResult<()> {
    let project = parse_id(required(matches, "project")?, "project")?;
    let amount = required(matches, "amount")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let receipt = service.pay_contractor(project, amount).await?;
    print_receipt("Payment made to contractor successfully.", &receipt);
    Ok(())
}
