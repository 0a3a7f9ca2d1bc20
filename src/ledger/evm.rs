use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;

use super::{role_hash, FundsLedger, TxReceipt};
use crate::config::Config;
use crate::error::{FundsError, FundsResult};
use crate::logging::{log_debug, log_info};
use crate::models::{Contractor, Contribution, Expense, Project};

sol! {
    #[sol(rpc)]
    contract InfrastructureFunds {
        struct Project {
            uint256 id;
            string name;
            string description;
            uint256 budget;
            uint256 amountReceived;
            uint256 spent;
            bool funded;
            bool completed;
            address contractor;
            uint256 startDate;
            uint256 endDate;
        }

        struct Contractor {
            uint256 id;
            string name;
            string services;
            string description;
            address wallet;
        }

        struct Expense {
            uint256 id;
            uint256 projectId;
            address payee;
            string description;
            uint256 amount;
        }

        struct Contribution {
            uint256 projectId;
            address contributor;
            uint256 amount;
        }

        event ProjectCreated(uint256 indexed projectId, string name, uint256 budget);

        function addUser(address user) external;
        function assignRole(address user, bytes32 role) external;
        function revokeRole(address user) external;

        function createProject(string name, uint256 budget, address government, string description) external returns (uint256);
        function getProjectCount() external view returns (uint256);
        function getProject(uint256 projectId) external view returns (Project memory);
        function getAllProjects() external view returns (Project[] memory);
        function setProjectDates(uint256 projectId, uint256 startDate, uint256 endDate) external;
        function donate(uint256 projectId) external payable;
        function getContributionsByProjectId(uint256 projectId) external view returns (Contribution[] memory);

        function createContractor(string name, string services, string description, address wallet) external returns (uint256);
        function getContractorCount() external view returns (uint256);
        function getContractor(uint256 contractorId) external view returns (Contractor memory);
        function getAllContractors() external view returns (Contractor[] memory);
        function getContractorByProjectId(uint256 projectId) external view returns (Contractor memory);
        function assignContractor(uint256 projectId, address contractor) external;
        function payContractor(uint256 projectId, uint256 amount) external;

        function incurExpense(uint256 projectId, string description, address payee, uint256 amount) external returns (uint256);
        function getAllExpensesByProjectId(uint256 projectId) external view returns (Expense[] memory);
    }
}

impl From<InfrastructureFunds::Project> for Project {
    fn from(p: InfrastructureFunds::Project) -> Self {
        Project {
            id: p.id,
            name: p.name,
            description: p.description,
            budget: p.budget,
            amount_received: p.amountReceived,
            spent: p.spent,
            funded: p.funded,
            completed: p.completed,
            contractor: p.contractor,
            start_date: p.startDate.saturating_to::<u64>(),
            end_date: p.endDate.saturating_to::<u64>(),
        }
    }
}

impl From<InfrastructureFunds::Contractor> for Contractor {
    fn from(c: InfrastructureFunds::Contractor) -> Self {
        Contractor {
            id: c.id,
            name: c.name,
            services: c.services,
            description: c.description,
            wallet: c.wallet,
        }
    }
}

impl From<InfrastructureFunds::Expense> for Expense {
    fn from(e: InfrastructureFunds::Expense) -> Self {
        Expense {
            id: e.id,
            project_id: e.projectId,
            payee: e.payee,
            description: e.description,
            amount: e.amount,
        }
    }
}

impl From<InfrastructureFunds::Contribution> for Contribution {
    fn from(c: InfrastructureFunds::Contribution) -> Self {
        Contribution {
            project_id: c.projectId,
            contributor: c.contributor,
            amount: c.amount,
        }
    }
}

fn call_error(e: alloy::contract::Error) -> FundsError {
    FundsError::classify_revert(&e.to_string())
}

/// Sends a contract call, waits for the receipt and rejects failed receipts.
///
/// A fixed gas limit skips estimation, which is where reverts normally
/// surface, so the call is dry-run first. A mined failure is replayed as a
/// `call` to recover the revert reason.
macro_rules! submit {
    ($ledger:expr, $call:expr) => {{
        let mut call = $call;
        if let Some(gas) = $ledger.gas_limit {
            call = call.gas(gas);
            call.call().await.map_err(call_error)?;
        }
        let pending = call.send().await.map_err(call_error)?;
        let receipt: TransactionReceipt = pending
            .get_receipt()
            .await
            .map_err(|e| FundsError::RpcError(e.to_string()))?;
        let tx_hash = ReceiptResponse::transaction_hash(&receipt);
        if !ReceiptResponse::status(&receipt) {
            let replay = call.call().await.err().map(call_error);
            return Err(failed_receipt(tx_hash, replay));
        }
        log_debug(&format!("Transaction {} mined", tx_hash));
        receipt
    }};
}

/// Error for a mined transaction with failed status, preferring the revert
/// reason from replaying it.
fn failed_receipt(tx_hash: B256, replay: Option<FundsError>) -> FundsError {
    match replay {
        Some(error @ (FundsError::ContractRevert(_) | FundsError::InsufficientBalance)) => error,
        _ => FundsError::ContractRevert(format!("transaction {} failed", tx_hash)),
    }
}

fn project_created_id(logs: &[Log]) -> Option<U256> {
    logs.iter()
        .find_map(|log| log.log_decode::<InfrastructureFunds::ProjectCreated>().ok())
        .map(|event| event.inner.data.projectId)
}

/// `FundsLedger` backed by the deployed contract over JSON-RPC.
pub struct EvmLedger {
    contract: InfrastructureFunds::InfrastructureFundsInstance<DynProvider>,
    signer: Address,
    gas_limit: Option<u64>,
}

impl EvmLedger {
    pub fn connect(
        rpc_url: &str,
        contract_address: Address,
        private_key: &str,
        gas_limit: Option<u64>,
    ) -> FundsResult<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| FundsError::ConfigError(format!("signer_private_key is invalid: {}", e)))?;
        let signer_address = signer.address();

        let url: Url = rpc_url
            .parse()
            .map_err(|e| FundsError::ConfigError(format!("RPC URL '{}' is invalid: {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        log_info(&format!(
            "Connected to contract {} as {}",
            contract_address, signer_address
        ));

        Ok(Self::with_provider(provider, contract_address, signer_address, gas_limit))
    }

    pub fn with_provider(
        provider: DynProvider,
        contract_address: Address,
        signer: Address,
        gas_limit: Option<u64>,
    ) -> Self {
        Self {
            contract: InfrastructureFunds::new(contract_address, provider),
            signer,
            gas_limit,
        }
    }

    pub fn from_config(config: &Config) -> FundsResult<Self> {
        Self::connect(
            &config.rpc_url()?,
            config.contract_address()?,
            config.signer_private_key()?,
            config.gas_limit,
        )
    }

    /// Id from the `ProjectCreated` event, or the last id by count when the
    /// logs do not carry it.
    async fn created_project_id(&self, logs: &[Log]) -> FundsResult<U256> {
        match project_created_id(logs) {
            Some(id) => Ok(id),
            None => {
                log_debug("ProjectCreated event missing from receipt, using project count");
                Ok(self.project_count().await?.saturating_sub(U256::from(1)))
            }
        }
    }
}

#[async_trait]
impl FundsLedger for EvmLedger {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn create_project(
        &self,
        name: &str,
        budget: U256,
        government: Address,
        description: &str,
    ) -> FundsResult<TxReceipt> {
        let receipt = submit!(
            self,
            self.contract.createProject(
                name.to_string(),
                budget,
                government,
                description.to_string()
            )
        );
        let tx_hash = ReceiptResponse::transaction_hash(&receipt);

        let id = self.created_project_id(receipt.inner.logs()).await?;
        Ok(TxReceipt::with_id(tx_hash, id))
    }

    async fn project_count(&self) -> FundsResult<U256> {
        self.contract.getProjectCount().call().await.map_err(call_error)
    }

    async fn get_project(&self, id: U256) -> FundsResult<Project> {
        let project = self.contract.getProject(id).call().await.map_err(call_error)?;
        Ok(project.into())
    }

    async fn get_all_projects(&self) -> FundsResult<Vec<Project>> {
        let projects = self.contract.getAllProjects().call().await.map_err(call_error)?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn set_project_dates(&self, id: U256, start: u64, end: u64) -> FundsResult<TxReceipt> {
        let receipt = submit!(
            self,
            self.contract
                .setProjectDates(id, U256::from(start), U256::from(end))
        );
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn donate(&self, id: U256, amount: U256) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.donate(id).value(amount));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn contributions(&self, project_id: U256) -> FundsResult<Vec<Contribution>> {
        let contributions = self
            .contract
            .getContributionsByProjectId(project_id)
            .call()
            .await
            .map_err(call_error)?;
        Ok(contributions.into_iter().map(Contribution::from).collect())
    }

    async fn create_contractor(
        &self,
        name: &str,
        services: &str,
        description: &str,
        wallet: Address,
    ) -> FundsResult<TxReceipt> {
        let receipt = submit!(
            self,
            self.contract.createContractor(
                name.to_string(),
                services.to_string(),
                description.to_string(),
                wallet
            )
        );
        let tx_hash = ReceiptResponse::transaction_hash(&receipt);
        let id = self.contractor_count().await?.saturating_sub(U256::from(1));
        Ok(TxReceipt::with_id(tx_hash, id))
    }

    async fn contractor_count(&self) -> FundsResult<U256> {
        self.contract.getContractorCount().call().await.map_err(call_error)
    }

    async fn get_contractor(&self, id: U256) -> FundsResult<Contractor> {
        let contractor = self.contract.getContractor(id).call().await.map_err(call_error)?;
        Ok(contractor.into())
    }

    async fn get_all_contractors(&self) -> FundsResult<Vec<Contractor>> {
        let contractors = self.contract.getAllContractors().call().await.map_err(call_error)?;
        Ok(contractors.into_iter().map(Contractor::from).collect())
    }

    async fn contractor_by_project(&self, project_id: U256) -> FundsResult<Option<Contractor>> {
        let contractor = self
            .contract
            .getContractorByProjectId(project_id)
            .call()
            .await
            .map_err(call_error)?;
        if contractor.wallet.is_zero() {
            return Ok(None);
        }
        Ok(Some(contractor.into()))
    }

    async fn assign_contractor(&self, project_id: U256, contractor: Address) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.assignContractor(project_id, contractor));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn pay_contractor(&self, project_id: U256, amount: U256) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.payContractor(project_id, amount));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn incur_expense(
        &self,
        project_id: U256,
        description: &str,
        payee: Address,
        amount: U256,
    ) -> FundsResult<TxReceipt> {
        let receipt = submit!(
            self,
            self.contract
                .incurExpense(project_id, description.to_string(), payee, amount)
        );
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn expenses(&self, project_id: U256) -> FundsResult<Vec<Expense>> {
        let expenses = self
            .contract
            .getAllExpensesByProjectId(project_id)
            .call()
            .await
            .map_err(call_error)?;
        Ok(expenses.into_iter().map(Expense::from).collect())
    }

    async fn add_user(&self, user: Address) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.addUser(user));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn assign_role(&self, user: Address, role: &str) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.assignRole(user, role_hash(role)));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }

    async fn revoke_role(&self, user: Address) -> FundsResult<TxReceipt> {
        let receipt = submit!(self, self.contract.revokeRole(user));
        Ok(TxReceipt::new(ReceiptResponse::transaction_hash(&receipt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, LogData};
    use alloy::sol_types::SolEvent;
    use alloy::transports::mock::Asserter;

    const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const PAYEE: Address = address!("90F79bf6EB2c4f870365E785982E1f101E93b906");

    fn mocked_ledger(asserter: &Asserter, gas_limit: Option<u64>) -> EvmLedger {
        let provider = ProviderBuilder::default()
            .connect_mocked_client(asserter.clone())
            .erased();
        EvmLedger::with_provider(provider, CONTRACT, Address::repeat_byte(0x01), gas_limit)
    }

    fn project_created_log(id: u64) -> Log {
        let event = InfrastructureFunds::ProjectCreated {
            projectId: U256::from(id),
            name: "Dam Construction".to_string(),
            budget: U256::from(10),
        };
        Log {
            inner: alloy::primitives::Log {
                address: CONTRACT,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    fn encoded_u256(value: u64) -> Bytes {
        Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec())
    }

    #[test]
    fn test_project_id_from_event() {
        let unrelated = Log {
            inner: alloy::primitives::Log {
                address: CONTRACT,
                data: LogData::new_unchecked(vec![B256::ZERO], Bytes::new()),
            },
            ..Default::default()
        };

        assert_eq!(project_created_id(&[unrelated.clone(), project_created_log(7)]), Some(U256::from(7)));
        assert_eq!(project_created_id(&[unrelated]), None);
        assert_eq!(project_created_id(&[]), None);
    }

    #[tokio::test]
    async fn test_created_id_prefers_event() {
        let asserter = Asserter::new();
        let ledger = mocked_ledger(&asserter, None);

        let id = ledger.created_project_id(&[project_created_log(3)]).await.unwrap();
        // No response queued, so a count lookup would have failed
        assert_eq!(id, U256::from(3));
    }

    #[tokio::test]
    async fn test_created_id_falls_back_to_count() {
        let asserter = Asserter::new();
        asserter.push_success(&encoded_u256(5));
        let ledger = mocked_ledger(&asserter, None);

        let id = ledger.created_project_id(&[]).await.unwrap();
        assert_eq!(id, U256::from(4));
    }

    #[tokio::test]
    async fn test_read_revert_reason() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted: Project does not exist");
        let ledger = mocked_ledger(&asserter, None);

        match ledger.get_project(U256::from(9)).await {
            Err(FundsError::ContractRevert(reason)) => assert_eq!(reason, "Project does not exist"),
            other => panic!("Expected ContractRevert, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fixed_gas_dry_run_reports_insufficient_balance() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted: Insufficient contract balance");
        let ledger = mocked_ledger(&asserter, Some(300_000));

        let result = ledger
            .incur_expense(U256::ZERO, "Cement", PAYEE, U256::from(1_000))
            .await;
        assert!(matches!(result, Err(FundsError::InsufficientBalance)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_rpc_error() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("header not found");
        let ledger = mocked_ledger(&asserter, None);

        assert!(matches!(ledger.project_count().await, Err(FundsError::RpcError(_))));
    }

    #[test]
    fn test_failed_receipt_prefers_replayed_reason() {
        let tx_hash = B256::repeat_byte(0xab);

        let error = failed_receipt(tx_hash, Some(FundsError::InsufficientBalance));
        assert!(error.is_insufficient_balance());

        match failed_receipt(tx_hash, Some(FundsError::ContractRevert("No contractor assigned".to_string()))) {
            FundsError::ContractRevert(reason) => assert_eq!(reason, "No contractor assigned"),
            other => panic!("Expected ContractRevert, got {:?}", other),
        }

        for replay in [None, Some(FundsError::RpcError("timeout".to_string()))] {
            match failed_receipt(tx_hash, replay) {
                FundsError::ContractRevert(reason) => assert!(reason.contains(&tx_hash.to_string())),
                other => panic!("Expected ContractRevert, got {:?}", other),
            }
        }
    }
}
