use clap::ArgMatches;

use super::{print_receipt, required};
use crate::cli_context::CliContext;
use crate::error::{FundsError, FundsResult};
use crate::formatting::render_expenses;
use crate::service::{parse_id, FundsService};

pub async fn handle_expense(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let result = match matches.subcommand() {
        Some(("add", add_matches)) => handle_expense_add_impl(add_matches).await,
        Some(("list", list_matches)) => handle_expense_list_impl(list_matches).await,
        _ => Err(FundsError::InvalidInput(
            "Unknown expense subcommand. Use 'infra-funds expense --help' for available options.".to_string(),
        )),
    };
    result.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_expense_add_impl(matches: &ArgMatches) -> FundsResult<()> {
    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;
    add_expense(&service, matches).await
}

/// Log the expense described by `matches`. Failures, including an
/// insufficient contract balance, are returned for `main` to report.
async fn add_expense(service: &FundsService, matches: &ArgMatches) -> FundsResult<()> {
    let project = parse_id(required(matches, "project")?, "project")?;
    let amount = required(matches, "amount")?;
    let payee = required(matches, "payee")?;
    let description = required(matches, "description")?;

    let receipt = service.add_expense(project, payee, description, amount).await?;
    print_receipt("Expense logged successfully.", &receipt);
    Ok(())
}

async fn handle_expense_list_impl(matches: &ArgMatches) -> FundsResult<()> {
    let project = parse_id(required(matches, "project")?, "project")?;

    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let expenses = service.list_expenses(project).await?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
    } else {
        print!("{}", render_expenses(&expenses));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::address;

    use super::*;
    use crate::cli::build_cli;
    use crate::ledger::{FundsLedger, MemoryLedger};
    use crate::units::ether;

    fn add_matches(args: &[&str]) -> ArgMatches {
        let matches = build_cli()
            .try_get_matches_from(["infra-funds", "expense", "add"].iter().chain(args))
            .unwrap();
        let (_, expense) = matches.subcommand().unwrap();
        let (_, add) = expense.subcommand().unwrap();
        add.clone()
    }

    async fn unfunded_service() -> FundsService {
        let ledger = Arc::new(MemoryLedger::new());
        let government = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
        ledger
            .create_project("Bridge", ether(10), government, "Repairs")
            .await
            .unwrap();
        FundsService::new(ledger)
    }

    #[tokio::test]
    async fn test_insufficient_balance_is_returned_unchanged() {
        let service = unfunded_service().await;
        let matches = add_matches(&[
            "0",
            "--amount",
            "1",
            "--payee",
            "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
            "--description",
            "Steel",
        ]);

        let result = add_expense(&service, &matches).await;
        assert!(matches!(result, Err(FundsError::InsufficientBalance)));
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected_before_submission() {
        let service = unfunded_service().await;
        let matches = add_matches(&[
            "0",
            "--amount",
            "abc",
            "--payee",
            "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
            "--description",
            "Steel",
        ]);

        let result = add_expense(&service, &matches).await;
        assert!(matches!(result, Err(FundsError::InvalidInput(_))));
    }
}
