use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::{as_address, as_decimal};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(serialize_with = "as_decimal")]
    pub id: U256,
    #[serde(serialize_with = "as_decimal")]
    pub project_id: U256,
    #[serde(serialize_with = "as_address")]
    pub payee: Address,
    pub description: String,
    #[serde(serialize_with = "as_decimal")]
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    #[serde(serialize_with = "as_decimal")]
    pub project_id: U256,
    #[serde(serialize_with = "as_address")]
    pub contributor: Address,
    #[serde(serialize_with = "as_decimal")]
    pub amount: U256,
}
