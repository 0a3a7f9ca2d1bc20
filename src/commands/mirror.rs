use clap::ArgMatches;
use colored::*;

use crate::cli_context::CliContext;
use crate::error::FundsResult;
use crate::models::DocumentList;

pub async fn handle_mirror(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_mirror_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_mirror_impl(matches: &ArgMatches) -> FundsResult<()> {
    let sub_matches = matches.subcommand_matches("list").unwrap_or(matches);
    let mut context = CliContext::from_matches(sub_matches)?;
    let service = context.service()?;

    let list = service.mirrored_projects().await?;
    if list.documents.is_empty() {
        println!("{}", "No mirrored projects found.".dimmed());
        return Ok(());
    }

    println!("{}", list_header(&list));
    for document in list.documents {
        println!(
            "  {} {} {}",
            format!("#{}", document.project_id).blue(),
            document.name.bold(),
            document.document_id.as_deref().unwrap_or("").dimmed()
        );
    }
    Ok(())
}

fn list_header(list: &DocumentList) -> String {
    let shown = list.documents.len() as u64;
    if shown < list.total {
        format!("Found {} mirrored projects (showing {}):", list.total, shown)
    } else {
        format!("Found {} mirrored projects:", shown)
    }
}
