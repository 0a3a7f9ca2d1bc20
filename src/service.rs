use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tokio::sync::Mutex;

use crate::error::{FundsError, FundsResult};
use crate::ledger::{FundsLedger, TxReceipt};
use crate::logging::{log_error, log_info, log_warn};
use crate::mirror::DocumentMirror;
use crate::models::{Contractor, DocumentList, Expense, MirroredProject, Project, ProjectDetails};
use crate::units::{parse_positive_ether, parse_timestamp};

/// What happened to the off-chain copy of a newly created project.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorOutcome {
    Stored(MirroredProject),
    /// No document store configured, or the caller opted out.
    Skipped,
    /// The project exists on-chain but the copy could not be written.
    Failed(String),
}

/// Input for `FundsService::create_project`, as typed by the user.
#[derive(Debug, Clone, Copy)]
pub struct NewProject<'a> {
    pub name: &'a str,
    pub budget_eth: &'a str,
    pub description: &'a str,
    /// Overrides the service's government address.
    pub government: Option<Address>,
    /// Write the document-store copy when a store is configured.
    pub mirror: bool,
}

impl<'a> NewProject<'a> {
    pub fn new(name: &'a str, budget_eth: &'a str, description: &'a str) -> Self {
        Self {
            name,
            budget_eth,
            description,
            government: None,
            mirror: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub id: U256,
    pub receipt: TxReceipt,
    pub mirror: MirrorOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedContractor {
    pub id: Option<U256>,
    pub receipt: TxReceipt,
}

/// A contractor given either by registry id or by wallet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractorRef {
    Id(U256),
    Wallet(Address),
}

impl FromStr for ContractorRef {
    type Err = FundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            return parse_address(trimmed, "contractor").map(ContractorRef::Wallet);
        }
        parse_id(trimmed, "contractor").map(ContractorRef::Id)
    }
}

pub fn parse_address(input: &str, field: &str) -> FundsResult<Address> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FundsError::InvalidInput(format!("{} address is required", field)));
    }
    trimmed
        .parse::<Address>()
        .map_err(|_| FundsError::InvalidInput(format!("'{}' is not a valid {} address", trimmed, field)))
}

pub fn parse_id(input: &str, field: &str) -> FundsResult<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(FundsError::InvalidInput(format!("'{}' is not a valid {} id", trimmed, field)));
    }
    U256::from_str_radix(trimmed, 10)
        .map_err(|_| FundsError::InvalidInput(format!("'{}' is not a valid {} id", trimmed, field)))
}

/// Client-side operations over the funds contract and the document mirror.
///
/// Validates user input before anything is sent, serialises state-changing
/// calls made through one service, and keeps the contract as the only source
/// of truth: every read goes back to the ledger.
pub struct FundsService {
    ledger: Arc<dyn FundsLedger>,
    mirror: Option<Arc<dyn DocumentMirror>>,
    government: Option<Address>,
    write_lock: Mutex<()>,
}

impl FundsService {
    pub fn new(ledger: Arc<dyn FundsLedger>) -> Self {
        Self {
            ledger,
            mirror: None,
            government: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn DocumentMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_government(mut self, government: Address) -> Self {
        self.government = Some(government);
        self
    }

    pub fn signer(&self) -> Address {
        self.ledger.signer()
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// Government address recorded on new projects; the signer when unset.
    pub fn government(&self) -> Address {
        self.government.unwrap_or_else(|| self.ledger.signer())
    }

    /// All projects, with `amount_received` recomputed from contributions.
    pub async fn list_projects(&self) -> FundsResult<Vec<Project>> {
        let mut projects = self.ledger.get_all_projects().await?;
        for project in projects.iter_mut() {
            project.amount_received = self.total_contributions(project.id).await;
        }
        Ok(projects)
    }

    async fn total_contributions(&self, project_id: U256) -> U256 {
        match self.ledger.contributions(project_id).await {
            Ok(contributions) => contributions
                .iter()
                .fold(U256::ZERO, |acc, c| acc.saturating_add(c.amount)),
            Err(e) => {
                log_warn(&format!(
                    "Error fetching contributions for project {}: {}",
                    project_id, e
                ));
                U256::ZERO
            }
        }
    }

    pub async fn project_details(&self, id: U256) -> FundsResult<ProjectDetails> {
        let project = self
            .ledger
            .get_all_projects()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| FundsError::NotFound(format!("Project {}", id)))?;

        let expenses = self.ledger.expenses(id).await?;

        let contractor = if project.has_contractor() {
            match self.contractor_for_project(id).await {
                Ok(contractor) => contractor,
                Err(e) => {
                    log_warn(&format!("Error fetching contractor for project {}: {}", id, e));
                    None
                }
            }
        } else {
            None
        };

        Ok(ProjectDetails {
            project,
            expenses,
            contractor,
        })
    }

    /// Create a project on-chain, then copy its metadata to the document store.
    ///
    /// A failed copy is logged and reported in the outcome; the on-chain
    /// project stays created.
    pub async fn create_project(&self, request: NewProject<'_>) -> FundsResult<CreatedProject> {
        if request.name.trim().is_empty() || request.budget_eth.trim().is_empty() {
            return Err(FundsError::InvalidInput(
                "Please enter a valid project name and budget".to_string(),
            ));
        }
        let budget = parse_positive_ether(request.budget_eth)?;
        let name = request.name.trim();
        let description = request.description.trim();
        let government = request.government.unwrap_or_else(|| self.government());

        let receipt = {
            let _guard = self.write_lock.lock().await;
            self.ledger
                .create_project(name, budget, government, description)
                .await?
        };
        let id = receipt
            .created_id
            .ok_or_else(|| FundsError::Unknown("ledger did not report the new project id".to_string()))?;
        log_info(&format!("Project {} created: {} ({})", id, name, receipt.tx_hash));

        let mirror = match (&self.mirror, request.mirror) {
            (Some(store), true) => match store.add_project(name, description, id).await {
                Ok(document) => MirrorOutcome::Stored(document),
                Err(e) => {
                    log_error(&format!("Error adding project {} to document store: {}", id, e));
                    MirrorOutcome::Failed(e.to_string())
                }
            },
            _ => MirrorOutcome::Skipped,
        };

        Ok(CreatedProject { id, receipt, mirror })
    }

    pub async fn fund_project(&self, id: U256, amount_eth: &str) -> FundsResult<TxReceipt> {
        let amount = parse_positive_ether(amount_eth)?;
        let _guard = self.write_lock.lock().await;
        let receipt = self.ledger.donate(id, amount).await?;
        log_info(&format!("Donated {} wei to project {} ({})", amount, id, receipt.tx_hash));
        Ok(receipt)
    }

    pub async fn set_project_dates(&self, id: U256, start: &str, end: &str) -> FundsResult<TxReceipt> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        if end < start {
            return Err(FundsError::InvalidInput(
                "End date must not be before the start date".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;
        self.ledger.set_project_dates(id, start, end).await
    }

    /// Resolve a contractor reference to the wallet the contract stores.
    pub async fn resolve_contractor(&self, contractor: ContractorRef) -> FundsResult<Address> {
        match contractor {
            ContractorRef::Wallet(wallet) => Ok(wallet),
            ContractorRef::Id(id) => Ok(self.ledger.get_contractor(id).await?.wallet),
        }
    }

    /// The assignment check and the submission run under the write lock, so
    /// concurrent calls for one project submit at most once.
    pub async fn assign_contractor(&self, project_id: U256, contractor: ContractorRef) -> FundsResult<TxReceipt> {
        let _guard = self.write_lock.lock().await;

        let wallet = self.resolve_contractor(contractor).await?;
        if wallet.is_zero() {
            return Err(FundsError::InvalidInput("Contractor address must not be zero".to_string()));
        }

        let project = self.ledger.get_project(project_id).await?;
        if project.has_contractor() {
            return Err(FundsError::InvalidInput(format!(
                "Project {} already has contractor {}",
                project_id, project.contractor
            )));
        }

        let receipt = self.ledger.assign_contractor(project_id, wallet).await?;
        log_info(&format!("Assigned {} to project {}", wallet, project_id));
        Ok(receipt)
    }

    pub async fn add_expense(
        &self,
        project_id: U256,
        payee: &str,
        description: &str,
        amount_eth: &str,
    ) -> FundsResult<TxReceipt> {
        if payee.trim().is_empty() || description.trim().is_empty() || amount_eth.trim().is_empty() {
            return Err(FundsError::InvalidInput(
                "Payee, description and amount are all required".to_string(),
            ));
        }
        let payee = parse_address(payee, "payee")?;
        let amount = parse_positive_ether(amount_eth)?;

        let _guard = self.write_lock.lock().await;
        match self
            .ledger
            .incur_expense(project_id, description.trim(), payee, amount)
            .await
        {
            Ok(receipt) => {
                log_info(&format!("Expense of {} wei logged on project {}", amount, project_id));
                Ok(receipt)
            }
            Err(e) => {
                log_error(&format!("Error adding expense to project {}: {}", project_id, e));
                Err(e)
            }
        }
    }

    pub async fn pay_contractor(&self, project_id: U256, amount_eth: &str) -> FundsResult<TxReceipt> {
        let amount = parse_positive_ether(amount_eth)?;
        let _guard = self.write_lock.lock().await;
        self.ledger.pay_contractor(project_id, amount).await
    }

    pub async fn list_expenses(&self, project_id: U256) -> FundsResult<Vec<Expense>> {
        self.ledger.expenses(project_id).await
    }

    pub async fn create_contractor(
        &self,
        name: &str,
        services: &str,
        description: &str,
        wallet: &str,
    ) -> FundsResult<CreatedContractor> {
        if name.trim().is_empty() {
            return Err(FundsError::InvalidInput("Contractor name is required".to_string()));
        }
        let wallet = parse_address(wallet, "wallet")?;

        let _guard = self.write_lock.lock().await;
        let receipt = self
            .ledger
            .create_contractor(name.trim(), services.trim(), description.trim(), wallet)
            .await?;
        log_info(&format!("Contractor created: {}", name.trim()));
        Ok(CreatedContractor {
            id: receipt.created_id,
            receipt,
        })
    }

    pub async fn list_contractors(&self) -> FundsResult<Vec<Contractor>> {
        self.ledger.get_all_contractors().await
    }

    pub async fn contractor_for_project(&self, project_id: U256) -> FundsResult<Option<Contractor>> {
        self.ledger.contractor_by_project(project_id).await
    }

    pub async fn add_user(&self, user: &str) -> FundsResult<TxReceipt> {
        let user = parse_address(user, "user")?;
        let _guard = self.write_lock.lock().await;
        self.ledger.add_user(user).await
    }

    pub async fn assign_role(&self, user: &str, role: &str) -> FundsResult<TxReceipt> {
        let user = parse_address(user, "user")?;
        if role.trim().is_empty() {
            return Err(FundsError::InvalidInput("Role is required".to_string()));
        }
        let _guard = self.write_lock.lock().await;
        self.ledger.assign_role(user, role.trim()).await
    }

    pub async fn revoke_role(&self, user: &str) -> FundsResult<TxReceipt> {
        let user = parse_address(user, "user")?;
        let _guard = self.write_lock.lock().await;
        self.ledger.revoke_role(user).await
    }

    pub async fn mirrored_projects(&self) -> FundsResult<DocumentList> {
        match &self.mirror {
            Some(store) => store.list_projects().await,
            None => Err(FundsError::ConfigError(
                "Document store is not configured (appwrite_project, database_id, projects_collection_id)"
                    .to_string(),
            )),
        }
    }
}
