pub mod contractor;
pub mod expense;
pub mod mirror;
pub mod project;

pub use contractor::Contractor;
pub use expense::{Contribution, Expense};
pub use mirror::{DocumentList, MirroredProject};
pub use project::{FundingStatus, Project, ProjectDetails};

use alloy::primitives::{Address, U256};
use serde::Serializer;

// Amounts and ids are written as decimal strings, addresses as checksummed hex
pub(crate) fn as_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn as_address<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.to_checksum(None))
}
