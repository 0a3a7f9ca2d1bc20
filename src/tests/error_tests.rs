use crate::error::{ErrorContext, FundsError};
use crate::funds_error;

#[test]
fn test_error_context_on_result() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "file not found"
    ));

    let funds_result = result.context("Failed to read config file");
    match funds_result {
        Err(FundsError::Unknown(msg)) => {
            assert!(msg.contains("Failed to read config file"));
            assert!(msg.contains("file not found"));
        }
        _ => panic!("Expected FundsError::Unknown"),
    }
}

#[test]
fn test_error_context_on_option() {
    let option: Option<String> = None;
    match option.context("Contract address not found") {
        Err(FundsError::Unknown(msg)) => assert_eq!(msg, "Contract address not found"),
        _ => panic!("Expected FundsError::Unknown"),
    }
}

#[test]
fn test_error_context_with_closure() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "access denied"
    ));

    let funds_result = result.with_context(|| format!("Failed to write {}", "/tmp/config.json"));
    match funds_result {
        Err(FundsError::Unknown(msg)) => {
            assert!(msg.contains("Failed to write /tmp/config.json"));
            assert!(msg.contains("access denied"));
        }
        _ => panic!("Expected FundsError::Unknown"),
    }
}

#[test]
fn test_funds_error_macro() {
    let error = funds_error!(RpcError, "connection refused");
    assert!(matches!(error, FundsError::RpcError(ref msg) if msg == "connection refused"));

    let error = funds_error!(NotFound, "Project {}", 7);
    assert_eq!(error.to_string(), "Not found: Project 7");
}

#[test]
fn test_classify_insufficient_balance() {
    let raw = "server returned an error response: error code 3: execution reverted: Insufficient contract balance, data: \"0x08c379a0\"";
    let error = FundsError::classify_revert(raw);
    assert!(error.is_insufficient_balance());
    assert!(error.to_string().contains("enough funds"));
}

#[test]
fn test_classify_revert_reason() {
    let raw = "execution reverted: revert Project does not exist, data: \"0x08c379a0\"";
    match FundsError::classify_revert(raw) {
        FundsError::ContractRevert(reason) => assert_eq!(reason, "Project does not exist"),
        other => panic!("Expected ContractRevert, got {:?}", other),
    }

    match FundsError::classify_revert("execution reverted") {
        FundsError::ContractRevert(reason) => assert_eq!(reason, "no reason given"),
        other => panic!("Expected ContractRevert, got {:?}", other),
    }
}

#[test]
fn test_classify_transport_error() {
    let error = FundsError::classify_revert("error sending request for url (http://localhost:8545/)");
    assert!(matches!(error, FundsError::RpcError(_)));
    assert!(!error.is_insufficient_balance());
}

#[test]
fn test_config_missing_message_names_key() {
    let error = FundsError::ConfigMissing("contract_address".to_string());
    let message = error.to_string();
    assert!(message.contains("contract_address"));
    assert!(message.contains("config set"));
}
