use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::{as_address, as_decimal, Contractor, Expense};
use crate::constants::{FUNDING_ACCEPTING, FUNDING_NO, FUNDING_YES};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(serialize_with = "as_decimal")]
    pub id: U256,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "as_decimal")]
    pub budget: U256,
    #[serde(serialize_with = "as_decimal")]
    pub amount_received: U256,
    #[serde(serialize_with = "as_decimal")]
    pub spent: U256,
    pub funded: bool,
    pub completed: bool,
    #[serde(serialize_with = "as_address")]
    pub contractor: Address,
    pub start_date: u64,
    pub end_date: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingStatus {
    NotFunded,
    AcceptingFunds,
    FullyFunded,
}

impl FundingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FundingStatus::NotFunded => FUNDING_NO,
            FundingStatus::AcceptingFunds => FUNDING_ACCEPTING,
            FundingStatus::FullyFunded => FUNDING_YES,
        }
    }
}

impl Project {
    pub fn has_contractor(&self) -> bool {
        !self.contractor.is_zero()
    }

    pub fn funding_status(&self) -> FundingStatus {
        if !self.funded {
            FundingStatus::NotFunded
        } else if self.amount_received < self.budget {
            FundingStatus::AcceptingFunds
        } else {
            FundingStatus::FullyFunded
        }
    }

    /// Funds received but not yet spent on this project.
    pub fn remaining(&self) -> U256 {
        self.amount_received.saturating_sub(self.spent)
    }
}

/// Everything the project detail view shows.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    pub project: Project,
    pub expenses: Vec<Expense>,
    pub contractor: Option<Contractor>,
}
