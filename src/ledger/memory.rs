use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{address, keccak256, Address, B256, U256};
use async_trait::async_trait;

use super::{role_hash, FundsLedger, TxReceipt};
use crate::error::{FundsError, FundsResult, INSUFFICIENT_BALANCE_REASON};
use crate::models::{Contractor, Contribution, Expense, Project};

/// First well-known development account, used when no signer is given.
pub const DEV_SIGNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

const CONTRACTOR_PAYMENT: &str = "Contractor payment";

#[derive(Debug, Default)]
struct LedgerState {
    projects: Vec<Project>,
    contractors: Vec<Contractor>,
    expenses: Vec<Expense>,
    contributions: Vec<Contribution>,
    users: HashMap<Address, Option<B256>>,
    balance: U256,
    nonce: u64,
}

impl LedgerState {
    fn next_hash(&mut self) -> B256 {
        self.nonce += 1;
        keccak256(self.nonce.to_be_bytes())
    }

    fn project_mut(&mut self, id: U256) -> FundsResult<&mut Project> {
        let index = index_of(id, self.projects.len(), "Project does not exist")?;
        Ok(&mut self.projects[index])
    }

    fn ensure_balance(&self, amount: U256) -> FundsResult<()> {
        if amount > self.balance {
            return Err(revert(INSUFFICIENT_BALANCE_REASON));
        }
        Ok(())
    }

    /// Moves funds out of the contract and books them against the project.
    fn spend(&mut self, project_id: U256, amount: U256) -> FundsResult<()> {
        let index = index_of(project_id, self.projects.len(), "Project does not exist")?;
        self.ensure_balance(amount)?;
        let project = &mut self.projects[index];
        project.spent += amount;
        if project.spent >= project.budget {
            project.completed = true;
        }
        self.balance -= amount;
        Ok(())
    }

    fn record_expense(&mut self, project_id: U256, payee: Address, description: &str, amount: U256) -> U256 {
        let id = U256::from(self.expenses.len());
        self.expenses.push(Expense {
            id,
            project_id,
            payee,
            description: description.to_string(),
            amount,
        });
        id
    }
}

fn revert(reason: &str) -> FundsError {
    FundsError::classify_revert(&format!("execution reverted: {}", reason))
}

fn index_of(id: U256, len: usize, reason: &str) -> FundsResult<usize> {
    u64::try_from(id)
        .ok()
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < len)
        .ok_or_else(|| revert(reason))
}

/// In-process model of the funds contract.
///
/// Holds the same records the contract does and rejects the same calls with
/// the same revert reasons, so flows can run without a network. The contract
/// balance is everything donated minus everything spent across projects.
pub struct MemoryLedger {
    signer: Address,
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_signer(DEV_SIGNER)
    }

    pub fn with_signer(signer: Address) -> Self {
        Self {
            signer,
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn state(&self) -> FundsResult<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| FundsError::Unknown("ledger state lock poisoned".to_string()))
    }

    /// Funds currently held by the contract.
    pub fn balance(&self) -> FundsResult<U256> {
        Ok(self.state()?.balance)
    }

    /// Hashed role currently held by `user`, if the user is known.
    pub fn role_of(&self, user: Address) -> FundsResult<Option<B256>> {
        Ok(self.state()?.users.get(&user).copied().flatten())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FundsLedger for MemoryLedger {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn create_project(
        &self,
        name: &str,
        budget: U256,
        _government: Address,
        description: &str,
    ) -> FundsResult<TxReceipt> {
        if name.trim().is_empty() {
            return Err(revert("Project name required"));
        }
        if budget.is_zero() {
            return Err(revert("Budget must be greater than zero"));
        }

        let mut state = self.state()?;
        let id = U256::from(state.projects.len());
        state.projects.push(Project {
            id,
            name: name.to_string(),
            description: description.to_string(),
            budget,
            amount_received: U256::ZERO,
            spent: U256::ZERO,
            funded: false,
            completed: false,
            contractor: Address::ZERO,
            start_date: 0,
            end_date: 0,
        });
        Ok(TxReceipt::with_id(state.next_hash(), id))
    }

    async fn project_count(&self) -> FundsResult<U256> {
        Ok(U256::from(self.state()?.projects.len()))
    }

    async fn get_project(&self, id: U256) -> FundsResult<Project> {
        let state = self.state()?;
        let index = index_of(id, state.projects.len(), "Project does not exist")?;
        Ok(state.projects[index].clone())
    }

    async fn get_all_projects(&self) -> FundsResult<Vec<Project>> {
        Ok(self.state()?.projects.clone())
    }

    async fn set_project_dates(&self, id: U256, start: u64, end: u64) -> FundsResult<TxReceipt> {
        if end < start {
            return Err(revert("End date must be after start date"));
        }
        let mut state = self.state()?;
        let project = state.project_mut(id)?;
        project.start_date = start;
        project.end_date = end;
        Ok(TxReceipt::new(state.next_hash()))
    }

    async fn donate(&self, id: U256, amount: U256) -> FundsResult<TxReceipt> {
        if amount.is_zero() {
            return Err(revert("Donation must be greater than zero"));
        }
        let signer = self.signer;
        let mut state = self.state()?;
        let project = state.project_mut(id)?;
        if project.completed {
            return Err(revert("Project is completed"));
        }
        project.amount_received += amount;
        project.funded = true;

        state.balance += amount;
        state.contributions.push(Contribution {
            project_id: id,
            contributor: signer,
            amount,
        });
        Ok(TxReceipt::new(state.next_hash()))
    }

    async fn contributions(&self, project_id: U256) -> FundsResult<Vec<Contribution>> {
        let state = self.state()?;
        index_of(project_id, state.projects.len(), "Project does not exist")?;
        Ok(state
            .contributions
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_contractor(
        &self,
        name: &str,
        services: &str,
        description: &str,
        wallet: Address,
    ) -> FundsResult<TxReceipt> {
        if name.trim().is_empty() {
            return Err(revert("Contractor name required"));
        }
        if wallet.is_zero() {
            return Err(revert("Invalid wallet address"));
        }

        let mut state = self.state()?;
        let id = U256::from(state.contractors.len());
        state.contractors.push(Contractor {
            id,
            name: name.to_string(),
            services: services.to_string(),
            description: description.to_string(),
            wallet,
        });
        Ok(TxReceipt::with_id(state.next_hash(), id))
    }

    async fn contractor_count(&self) -> FundsResult<U256> {
        Ok(U256::from(self.state()?.contractors.len()))
    }

    async fn get_contractor(&self, id: U256) -> FundsResult<Contractor> {
        let state = self.state()?;
        let index = index_of(id, state.contractors.len(), "Contractor does not exist")?;
        Ok(state.contractors[index].clone())
    }

    async fn get_all_contractors(&self) -> FundsResult<Vec<Contractor>> {
        Ok(self.state()?.contractors.clone())
    }

    async fn contractor_by_project(&self, project_id: U256) -> FundsResult<Option<Contractor>> {
        let state = self.state()?;
        let index = index_of(project_id, state.projects.len(), "Project does not exist")?;
        let wallet = state.projects[index].contractor;
        if wallet.is_zero() {
            return Ok(None);
        }
        Ok(state.contractors.iter().find(|c| c.wallet == wallet).cloned())
    }

    async fn assign_contractor(&self, project_id: U256, contractor: Address) -> FundsResult<TxReceipt> {
        if contractor.is_zero() {
            return Err(revert("Invalid contractor address"));
        }
        let mut state = self.state()?;
        let project = state.project_mut(project_id)?;
        if project.has_contractor() {
            return Err(revert("Contractor already assigned"));
        }
        project.contractor = contractor;
        Ok(TxReceipt::new(state.next_hash()))
    }

    async fn pay_contractor(&self, project_id: U256, amount: U256) -> FundsResult<TxReceipt> {
        if amount.is_zero() {
            return Err(revert("Payment must be greater than zero"));
        }
        let mut state = self.state()?;
        let payee = state.project_mut(project_id)?.contractor;
        if payee.is_zero() {
            return Err(revert("No contractor assigned"));
        }
        state.spend(project_id, amount)?;
        let id = state.record_expense(project_id, payee, CONTRACTOR_PAYMENT, amount);
        Ok(TxReceipt::with_id(state.next_hash(), id))
    }

    async fn incur_expense(
        &self,
        project_id: U256,
        description: &str,
        payee: Address,
        amount: U256,
    ) -> FundsResult<TxReceipt> {
        if amount.is_zero() {
            return Err(revert("Expense must be greater than zero"));
        }
        let mut state = self.state()?;
        state.spend(project_id, amount)?;
        let id = state.record_expense(project_id, payee, description, amount);
        Ok(TxReceipt::with_id(state.next_hash(), id))
    }

    async fn expenses(&self, project_id: U256) -> FundsResult<Vec<Expense>> {
        let state = self.state()?;
        index_of(project_id, state.projects.len(), "Project does not exist")?;
        Ok(state
            .expenses
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn add_user(&self, user: Address) -> FundsResult<TxReceipt> {
        let mut state = self.state()?;
        if state.users.contains_key(&user) {
            return Err(revert("User already exists"));
        }
        state.users.insert(user, None);
        Ok(TxReceipt::new(state.next_hash()))
    }

    async fn assign_role(&self, user: Address, role: &str) -> FundsResult<TxReceipt> {
        let mut state = self.state()?;
        match state.users.get_mut(&user) {
            Some(slot) => *slot = Some(role_hash(role)),
            None => return Err(revert("User does not exist")),
        }
        Ok(TxReceipt::new(state.next_hash()))
    }

    async fn revoke_role(&self, user: Address) -> FundsResult<TxReceipt> {
        let mut state = self.state()?;
        match state.users.get_mut(&user) {
            Some(slot) => *slot = None,
            None => return Err(revert("User does not exist")),
        }
        Ok(TxReceipt::new(state.next_hash()))
    }
}
