use std::fmt::Write as _;

use colored::*;

use super::projects::OutputFormat;
use super::utils::{first_line, truncate};
use crate::error::FundsResult;
use crate::models::Contractor;

pub fn render_contractors(contractors: &[Contractor], format: OutputFormat) -> FundsResult<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(contractors)?);
    }

    let mut out = String::new();
    if contractors.is_empty() {
        let _ = writeln!(out, "{}", "No contractors found.".dimmed());
        return Ok(out);
    }

    let _ = writeln!(out, "{}", "Contractors:".bold());
    for contractor in contractors {
        let _ = writeln!(
            out,
            "  {} - {} [{}] {}",
            format!("#{}", contractor.id).cyan(),
            contractor.name.bold(),
            contractor.services,
            contractor.wallet.to_checksum(None).dimmed()
        );
        let desc = first_line(&contractor.description);
        if format == OutputFormat::Table || desc.is_empty() {
            continue;
        }
        let _ = writeln!(out, "      {}", truncate(desc, 70).dimmed());
    }
    Ok(out)
}

pub fn print_contractors(contractors: &[Contractor], format: OutputFormat) -> FundsResult<()> {
    print!("{}", render_contractors(contractors, format)?);
    Ok(())
}
