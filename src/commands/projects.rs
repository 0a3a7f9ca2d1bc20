use clap::ArgMatches;
use colored::*;

use super::{print_receipt, required};
use crate::cli_context::CliContext;
use crate::error::FundsResult;
use crate::formatting::{print_project_details, print_projects, OutputFormat};
use crate::service::{parse_address, parse_id, MirrorOutcome, NewProject};

pub async fn handle_projects(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_projects_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_projects_impl(matches: &ArgMatches) -> FundsResult<()> {
    let format: OutputFormat = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("simple")
        .parse()?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let projects = service.list_projects().await?;
    if format != OutputFormat::Json && !projects.is_empty() {
        println!("Found {} projects:", projects.len());
    }
    print_projects(&projects, format)
}

pub async fn handle_project(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_project_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_project_impl(matches: &ArgMatches) -> FundsResult<()> {
    let id = parse_id(required(matches, "project")?, "project")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let details = service.project_details(id).await?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        print_project_details(&details);
    }
    Ok(())
}

pub async fn handle_create_project(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_create_project_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_create_project_impl(matches: &ArgMatches) -> FundsResult<()> {
    let name = required(matches, "name")?;
    let budget = required(matches, "budget")?;
    let description = required(matches, "description")?;

    let mut request = NewProject::new(name, budget, description);
    if let Some(government) = matches.get_one::<String>("government") {
        request.government = Some(parse_address(government, "government")?);
    }
    request.mirror = !matches.get_flag("no-mirror");

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let created = service.create_project(request).await?;
    print_receipt("Project created successfully!", &created.receipt);
    println!("{}: {}", "ID".bold(), created.id.to_string().bright_blue().bold());
    println!("{}: {}", "Name".bold(), name.trim());

    match created.mirror {
        MirrorOutcome::Stored(document) => println!(
            "{}: {}",
            "Document".bold(),
            document.document_id.as_deref().unwrap_or("stored")
        ),
        MirrorOutcome::Skipped => {}
        MirrorOutcome::Failed(reason) => {
            eprintln!("{} Failed to add project to the document store: {}", "⚠".yellow(), reason);
            eprintln!("The project exists on-chain; re-run the copy manually if needed.");
        }
    }
    Ok(())
}

pub async fn handle_fund(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_fund_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_fund_impl(matches: &ArgMatches) -> FundsResult<()> {
    let id = parse_id(required(matches, "project")?, "project")?;
    let amount = required(matches, "amount")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let receipt = service.fund_project(id, amount).await?;
    print_receipt(
        &format!("You have successfully donated {} ETH to Project ID: {}", amount.trim(), id),
        &receipt,
    );
    Ok(())
}

pub async fn handle_dates(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_dates_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_dates_impl(matches: &ArgMatches) -> FundsResult<()> {
    let id = parse_id(required(matches, "project")?, "project")?;
    let start = required(matches, "start")?;
    let end = required(matches, "end")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let receipt = service.set_project_dates(id, start, end).await?;
    print_receipt("Project dates set successfully.", &receipt);
    Ok(())
}
