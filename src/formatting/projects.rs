use std::fmt::Write as _;
use std::str::FromStr;

use colored::*;

use super::utils::*;
use crate::error::{FundsError, FundsResult};
use crate::models::{Expense, FundingStatus, Project, ProjectDetails};
use crate::units::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = FundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(OutputFormat::Simple),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(FundsError::InvalidInput(format!(
                "Unknown format '{}'. Use simple, table or json",
                other
            ))),
        }
    }
}

pub fn format_funding_status(status: FundingStatus) -> ColoredString {
    match status {
        FundingStatus::NotFunded => status.label().dimmed(),
        FundingStatus::AcceptingFunds => status.label().yellow(),
        FundingStatus::FullyFunded => status.label().green(),
    }
}

fn status_icon(status: FundingStatus) -> &'static str {
    match status {
        FundingStatus::NotFunded => "○",
        FundingStatus::AcceptingFunds => "◐",
        FundingStatus::FullyFunded => "✓",
    }
}

pub fn render_projects(projects: &[Project], format: OutputFormat) -> FundsResult<String> {
    let mut out = String::new();
    if projects.is_empty() {
        if format == OutputFormat::Json {
            return Ok("[]".to_string());
        }
        let _ = writeln!(out, "{}", "No projects found.".dimmed());
        return Ok(out);
    }

    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(projects)?;
        }
        OutputFormat::Table => {
            let _ = writeln!(out, "{}", "─".repeat(110).dimmed());
            let _ = writeln!(
                out,
                "{:<6} {:<32} {:<20} {:<20} {:<16} {:<14}",
                "ID".bold(),
                "Name".bold(),
                "Budget".bold(),
                "Received".bold(),
                "Funded".bold(),
                "Contractor".bold()
            );
            let _ = writeln!(out, "{}", "─".repeat(110).dimmed());

            for project in projects {
                let contractor = if project.has_contractor() {
                    short_address(&project.contractor).green()
                } else {
                    "Unassigned".dimmed()
                };
                let _ = writeln!(
                    out,
                    "{:<6} {:<32} {:<20} {:<20} {:<16} {:<14}",
                    project.id.to_string().blue(),
                    truncate(&project.name, 32),
                    format_eth(project.budget),
                    format_eth(project.amount_received),
                    format_funding_status(project.funding_status()),
                    contractor
                );
            }
            let _ = writeln!(out, "{}", "─".repeat(110).dimmed());
        }
        OutputFormat::Simple => {
            let order = [
                FundingStatus::AcceptingFunds,
                FundingStatus::NotFunded,
                FundingStatus::FullyFunded,
            ];

            for status in order {
                let group: Vec<&Project> = projects
                    .iter()
                    .filter(|p| p.funding_status() == status)
                    .collect();
                if group.is_empty() {
                    continue;
                }

                let _ = writeln!(
                    out,
                    "\n{} Funded: {} ({})",
                    status_icon(status),
                    status.label().bold(),
                    group.len()
                );
                let _ = writeln!(out, "{}", "─".repeat(50).dimmed());

                for project in group {
                    let desc = first_line(&project.description);
                    let desc_preview = if desc.is_empty() {
                        String::new()
                    } else {
                        format!("\n    {}", truncate(desc, 70).dimmed())
                    };
                    let _ = writeln!(
                        out,
                        "{} - {} ({} of {}){}{}",
                        format!("#{}", project.id).blue(),
                        project.name.bold(),
                        format_eth(project.amount_received),
                        format_eth(project.budget),
                        if project.completed {
                            format!(" {}", "[completed]".green())
                        } else {
                            String::new()
                        },
                        desc_preview
                    );
                }
            }
        }
    }

    Ok(out)
}

pub fn print_projects(projects: &[Project], format: OutputFormat) -> FundsResult<()> {
    println!("{}", render_projects(projects, format)?);
    Ok(())
}

pub fn render_expenses(expenses: &[Expense]) -> String {
    let mut out = String::new();
    if expenses.is_empty() {
        let _ = writeln!(out, "{}", "No expenses recorded.".dimmed());
        return out;
    }

    let _ = writeln!(
        out,
        "{:<6} {:<40} {:<16} {:<14}",
        "ID".bold(),
        "Description".bold(),
        "Amount (ETH)".bold(),
        "Payee".bold()
    );
    let _ = writeln!(out, "{}", "─".repeat(80).dimmed());
    for expense in expenses {
        let _ = writeln!(
            out,
            "{:<6} {:<40} {:<16} {:<14}",
            expense.id.to_string().blue(),
            truncate(&expense.description, 40),
            crate::units::format_ether(expense.amount),
            short_address(&expense.payee).dimmed()
        );
    }
    out
}

pub fn render_project_details(details: &ProjectDetails) -> String {
    let project = &details.project;
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "═".repeat(80).blue());
    let _ = writeln!(out, "{} {}", format!("#{}", project.id).blue().bold(), project.name.bold());
    let _ = writeln!(out, "{}", "─".repeat(80).dimmed());

    let _ = writeln!(out, "{}: {}", "Budget".dimmed(), format_eth(project.budget));
    let _ = writeln!(out, "{}: {}", "Spent".dimmed(), format_eth(project.spent));
    let _ = writeln!(out, "{}: {}", "Remaining".dimmed(), format_eth(project.remaining()));
    let _ = writeln!(out, "{}: {}", "Description".dimmed(), project.description);
    let _ = writeln!(out, "{}: {}", "Funded".dimmed(), format_flag(project.funded));
    let _ = writeln!(out, "{}: {}", "Completed".dimmed(), format_flag(project.completed));
    if project.start_date != 0 || project.end_date != 0 {
        let _ = writeln!(
            out,
            "{}: {} → {}",
            "Schedule".dimmed(),
            format_timestamp(project.start_date),
            format_timestamp(project.end_date)
        );
    }

    match &details.contractor {
        Some(contractor) => {
            let _ = writeln!(
                out,
                "{}: {} ({}) {}",
                "Assigned Contractor".dimmed(),
                contractor.name.green(),
                contractor.services,
                contractor.wallet.to_checksum(None).dimmed()
            );
        }
        None => {
            let _ = writeln!(
                out,
                "{}: {}",
                "Assigned Contractor".dimmed(),
                format_contractor_address(&project.contractor)
            );
        }
    }

    let _ = writeln!(out, "\n{}", "Expenses".bold());
    let _ = writeln!(out, "{}", "─".repeat(40).dimmed());
    out.push_str(&render_expenses(&details.expenses));
    let _ = writeln!(out, "{}", "═".repeat(80).blue());
    out
}

pub fn print_project_details(details: &ProjectDetails) {
    print!("{}", render_project_details(details));
}
