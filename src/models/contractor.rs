use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::{as_address, as_decimal};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contractor {
    #[serde(serialize_with = "as_decimal")]
    pub id: U256,
    pub name: String,
    pub services: String,
    pub description: String,
    #[serde(serialize_with = "as_address")]
    pub wallet: Address,
}
