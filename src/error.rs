use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Revert reason the contract uses when an expense or payment exceeds its balance.
pub const INSUFFICIENT_BALANCE_REASON: &str = "Insufficient contract balance";

lazy_static! {
    static ref REVERT_REASON: Regex =
        Regex::new(r"(?i)execution reverted:?\s*(?:revert\s*)?(.*)$").expect("valid revert regex");
}

#[derive(Error, Debug)]
pub enum FundsError {
    #[error("Missing configuration value '{0}'. Set it with 'infra-funds config set' or the matching FUNDS_* environment variable.")]
    ConfigMissing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("RPC request failed: {0}")]
    RpcError(String),

    #[error("Transaction reverted: {0}")]
    ContractRevert(String),

    #[error("Insufficient contract balance. Please ensure there are enough funds in the contract.")]
    InsufficientBalance,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Document store error: {0}")]
    MirrorError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type FundsResult<T> = Result<T, FundsError>;

impl FundsError {
    /// Turn a raw error message from a provider or the ledger model into a typed error.
    ///
    /// Messages carrying a revert reason become `ContractRevert`, except the
    /// balance check which maps to `InsufficientBalance`. Anything else is
    /// treated as a transport failure.
    pub fn classify_revert(message: &str) -> FundsError {
        if message.contains(INSUFFICIENT_BALANCE_REASON) {
            return FundsError::InsufficientBalance;
        }

        if let Some(captures) = REVERT_REASON.captures(message) {
            let reason = captures
                .get(1)
                .and_then(|m| m.as_str().split(", data:").next())
                .map(|r| r.trim().trim_matches('"'))
                .unwrap_or("");
            if reason.is_empty() {
                return FundsError::ContractRevert("no reason given".to_string());
            }
            return FundsError::ContractRevert(reason.to_string());
        }

        FundsError::RpcError(message.to_string())
    }

    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, FundsError::InsufficientBalance)
    }
}

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> FundsResult<T>;
    fn with_context<F>(self, f: F) -> FundsResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, msg: &str) -> FundsResult<T> {
        self.map_err(|e| FundsError::Unknown(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> FundsResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| FundsError::Unknown(format!("{}: {}", f(), e)))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, msg: &str) -> FundsResult<T> {
        self.ok_or_else(|| FundsError::Unknown(msg.to_string()))
    }

    fn with_context<F>(self, f: F) -> FundsResult<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| FundsError::Unknown(f()))
    }
}

#[macro_export]
macro_rules! funds_error {
    ($error_type:ident, $msg:expr) => {
        $crate::error::FundsError::$error_type($msg.to_string())
    };
    ($error_type:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::error::FundsError::$error_type(format!($fmt, $($arg)*))
    };
}
