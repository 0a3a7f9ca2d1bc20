//! Contract access. `FundsLedger` mirrors the `InfrastructureFunds` ABI one
//! method per entry; reads are `call`s, writes are signed `send`s.

pub mod evm;
pub mod memory;

pub use evm::EvmLedger;
pub use memory::MemoryLedger;

use alloy::primitives::{keccak256, Address, B256, U256};
use async_trait::async_trait;

use crate::error::FundsResult;
use crate::models::{Contractor, Contribution, Expense, Project};

/// Result of a mined state-changing call.
#[derive(Debug, Clone, PartialEq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    /// Id of the record the call created, when it creates one.
    pub created_id: Option<U256>,
}

impl TxReceipt {
    pub fn new(tx_hash: B256) -> Self {
        Self {
            tx_hash,
            created_id: None,
        }
    }

    pub fn with_id(tx_hash: B256, id: U256) -> Self {
        Self {
            tx_hash,
            created_id: Some(id),
        }
    }
}

/// The contract stores roles as `keccak256(role name)`.
pub fn role_hash(role: &str) -> B256 {
    keccak256(role.trim().as_bytes())
}

#[async_trait]
pub trait FundsLedger: Send + Sync {
    /// Account that signs state-changing calls.
    fn signer(&self) -> Address;

    async fn create_project(
        &self,
        name: &str,
        budget: U256,
        government: Address,
        description: &str,
    ) -> FundsResult<TxReceipt>;

    async fn project_count(&self) -> FundsResult<U256>;

    async fn get_project(&self, id: U256) -> FundsResult<Project>;

    async fn get_all_projects(&self) -> FundsResult<Vec<Project>>;

    async fn set_project_dates(&self, id: U256, start: u64, end: u64) -> FundsResult<TxReceipt>;

    async fn donate(&self, id: U256, amount: U256) -> FundsResult<TxReceipt>;

    async fn contributions(&self, project_id: U256) -> FundsResult<Vec<Contribution>>;

    async fn create_contractor(
        &self,
        name: &str,
        services: &str,
        description: &str,
        wallet: Address,
    ) -> FundsResult<TxReceipt>;

    async fn contractor_count(&self) -> FundsResult<U256>;

    async fn get_contractor(&self, id: U256) -> FundsResult<Contractor>;

    async fn get_all_contractors(&self) -> FundsResult<Vec<Contractor>>;

    /// Registered contractor assigned to the project, if any.
    async fn contractor_by_project(&self, project_id: U256) -> FundsResult<Option<Contractor>>;

    async fn assign_contractor(&self, project_id: U256, contractor: Address) -> FundsResult<TxReceipt>;

    async fn pay_contractor(&self, project_id: U256, amount: U256) -> FundsResult<TxReceipt>;

    async fn incur_expense(
        &self,
        project_id: U256,
        description: &str,
        payee: Address,
        amount: U256,
    ) -> FundsResult<TxReceipt>;

    async fn expenses(&self, project_id: U256) -> FundsResult<Vec<Expense>>;

    async fn add_user(&self, user: Address) -> FundsResult<TxReceipt>;

    async fn assign_role(&self, user: Address, role: &str) -> FundsResult<TxReceipt>;

    async fn revoke_role(&self, user: Address) -> FundsResult<TxReceipt>;
}
