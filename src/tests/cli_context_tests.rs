use std::sync::Arc;

use alloy::primitives::{address, Address};

use crate::cli::build_cli;
use crate::cli_context::{CliContext, CliContextBuilder};
use crate::commands::expenses::handle_expense;
use crate::commands::projects::handle_project;
use crate::config::Config;
use crate::error::FundsError;
use crate::ledger::memory::DEV_SIGNER;
use crate::ledger::MemoryLedger;

const GOVERNMENT: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

fn mirror_config() -> Config {
    Config {
        appwrite_project: Some("funds".to_string()),
        database_id: Some("db".to_string()),
        projects_collection_id: Some("projects".to_string()),
        ..Config::default()
    }
}

#[test]
fn test_cli_context_new_simulates() {
    let mut context = CliContext::new();
    assert!(context.is_simulated());

    let service = context.service().unwrap();
    assert_eq!(service.signer(), DEV_SIGNER);
    assert!(!service.has_mirror());
}

#[test]
fn test_service_is_cached() {
    let mut context = CliContext::new();
    let first = context.service().unwrap();
    let second = context.service().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_missing_connection_settings() {
    let mut context = CliContextBuilder::new()
        .with_config(Config::default())
        .build()
        .unwrap();

    // No rpc_url or rpc_api_key configured
    match context.service() {
        Err(FundsError::ConfigMissing(key)) => assert_eq!(key, "rpc_api_key"),
        Err(other) => panic!("Expected ConfigMissing, got {:?}", other),
        Ok(_) => panic!("Expected an error without connection settings"),
    }
}

#[test]
fn test_government_from_config() {
    let config = Config {
        government_address: Some(GOVERNMENT.to_string()),
        ..Config::default()
    };
    let mut context = CliContextBuilder::new()
        .with_config(config)
        .simulate(true)
        .build()
        .unwrap();

    let service = context.service().unwrap();
    assert_eq!(service.government(), GOVERNMENT);
}

#[test]
fn test_invalid_government_rejected() {
    let config = Config {
        government_address: Some("not-an-address".to_string()),
        ..Config::default()
    };
    let mut context = CliContextBuilder::new()
        .with_config(config)
        .simulate(true)
        .build()
        .unwrap();

    assert!(matches!(context.service(), Err(FundsError::ConfigError(_))));
}

#[test]
fn test_mirror_attached_with_ledger() {
    let context = CliContextBuilder::new()
        .with_config(mirror_config())
        .with_ledger(Arc::new(MemoryLedger::new()))
        .build();

    let mut context = context.unwrap();
    assert!(context.service().unwrap().has_mirror());
}

#[test]
fn test_simulation_never_mirrors() {
    let mut context = CliContextBuilder::new()
        .with_config(mirror_config())
        .simulate(true)
        .build()
        .unwrap();

    assert!(!context.service().unwrap().has_mirror());
}

#[tokio::test]
async fn test_handler_errors_keep_their_type() {
    let matches = build_cli()
        .try_get_matches_from(["infra-funds", "--simulate", "project", "4"])
        .unwrap();
    let (_, project) = matches.subcommand().unwrap();
    let err = handle_project(project).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<FundsError>(), Some(FundsError::NotFound(_))));

    let matches = build_cli()
        .try_get_matches_from([
            "infra-funds",
            "--simulate",
            "expense",
            "add",
            "4",
            "--amount",
            "1",
            "--payee",
            "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
            "--description",
            "Steel",
        ])
        .unwrap();
    let (_, expense) = matches.subcommand().unwrap();
    let err = handle_expense(expense).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FundsError>(),
        Some(FundsError::ContractRevert(reason)) if reason == "Project does not exist"
    ));
}
