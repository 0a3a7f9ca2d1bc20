use std::sync::Arc;

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;
use infra_funds_cli::error::{FundsError, FundsResult};
use infra_funds_cli::ledger::memory::DEV_SIGNER;
use infra_funds_cli::ledger::{role_hash, FundsLedger, TxReceipt};
use infra_funds_cli::models::{Contractor, Contribution, DocumentList, Expense, FundingStatus, MirroredProject, Project};
use infra_funds_cli::service::{ContractorRef, MirrorOutcome, NewProject};
use infra_funds_cli::units::ether;
use infra_funds_cli::{DocumentMirror, FundsService, MemoryLedger};
use tokio::sync::Mutex;

const CONTRACTOR: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
const PAYEE: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

fn service() -> (Arc<MemoryLedger>, FundsService) {
    let ledger = Arc::new(MemoryLedger::new());
    let service = FundsService::new(ledger.clone());
    (ledger, service)
}

#[derive(Default)]
struct RecordingMirror {
    stored: Mutex<Vec<MirroredProject>>,
}

#[async_trait]
impl DocumentMirror for RecordingMirror {
    async fn add_project(&self, name: &str, description: &str, project_id: U256) -> FundsResult<MirroredProject> {
        let document = MirroredProject {
            document_id: Some(format!("doc-{}", project_id)),
            name: name.to_string(),
            description: description.to_string(),
            project_id: project_id.to_string(),
        };
        self.stored.lock().await.push(document.clone());
        Ok(document)
    }

    async fn list_projects(&self) -> FundsResult<DocumentList> {
        let documents = self.stored.lock().await.clone();
        Ok(DocumentList {
            total: documents.len() as u64,
            documents,
        })
    }
}

/// Delegates to `MemoryLedger`, yielding on reads and counting assignments.
#[derive(Default)]
struct YieldingLedger {
    inner: MemoryLedger,
    assignments: AtomicUsize,
}

#[async_trait]
impl FundsLedger for YieldingLedger {
    fn signer(&self) -> Address {
        self.inner.signer()
    }

    async fn create_project(&self, name: &str, budget: U256, government: Address, description: &str) -> FundsResult<TxReceipt> {
        self.inner.create_project(name, budget, government, description).await
    }

    async fn project_count(&self) -> FundsResult<U256> {
        self.inner.project_count().await
    }

    async fn get_project(&self, id: U256) -> FundsResult<Project> {
        tokio::task::yield_now().await;
        self.inner.get_project(id).await
    }

    async fn get_all_projects(&self) -> FundsResult<Vec<Project>> {
        self.inner.get_all_projects().await
    }

    async fn set_project_dates(&self, id: U256, start: u64, end: u64) -> FundsResult<TxReceipt> {
        self.inner.set_project_dates(id, start, end).await
    }

    async fn donate(&self, id: U256, amount: U256) -> FundsResult<TxReceipt> {
        self.inner.donate(id, amount).await
    }

    async fn contributions(&self, project_id: U256) -> FundsResult<Vec<Contribution>> {
        self.inner.contributions(project_id).await
    }

    async fn create_contractor(&self, name: &str, services: &str, description: &str, wallet: Address) -> FundsResult<TxReceipt> {
        self.inner.create_contractor(name, services, description, wallet).await
    }

    async fn contractor_count(&self) -> FundsResult<U256> {
        self.inner.contractor_count().await
    }

    async fn get_contractor(&self, id: U256) -> FundsResult<Contractor> {
        self.inner.get_contractor(id).await
    }

    async fn get_all_contractors(&self) -> FundsResult<Vec<Contractor>> {
        self.inner.get_all_contractors().await
    }

    async fn contractor_by_project(&self, project_id: U256) -> FundsResult<Option<Contractor>> {
        self.inner.contractor_by_project(project_id).await
    }

    async fn assign_contractor(&self, project_id: U256, contractor: Address) -> FundsResult<TxReceipt> {
        self.assignments.fetch_add(1, Ordering::SeqCst);
        self.inner.assign_contractor(project_id, contractor).await
    }

    async fn pay_contractor(&self, project_id: U256, amount: U256) -> FundsResult<TxReceipt> {
        self.inner.pay_contractor(project_id, amount).await
    }

    async fn incur_expense(&self, project_id: U256, description: &str, payee: Address, amount: U256) -> FundsResult<TxReceipt> {
        self.inner.incur_expense(project_id, description, payee, amount).await
    }

    async fn expenses(&self, project_id: U256) -> FundsResult<Vec<Expense>> {
        self.inner.expenses(project_id).await
    }

    async fn add_user(&self, user: Address) -> FundsResult<TxReceipt> {
        self.inner.add_user(user).await
    }

    async fn assign_role(&self, user: Address, role: &str) -> FundsResult<TxReceipt> {
        self.inner.assign_role(user, role).await
    }

    async fn revoke_role(&self, user: Address) -> FundsResult<TxReceipt> {
        self.inner.revoke_role(user).await
    }
}

#[tokio::test]
async fn test_concurrent_assignments_submit_once() {
    let ledger = Arc::new(YieldingLedger::default());
    let service = FundsService::new(ledger.clone());
    let project = service.create_project(NewProject::new("Bridge", "3", "")).await.unwrap().id;
    let other = address!("15d34AAf54267DB7D7c367839AAf71A00a2C6A65");

    let (first, second) = tokio::join!(
        service.assign_contractor(project, ContractorRef::Wallet(CONTRACTOR)),
        service.assign_contractor(project, ContractorRef::Wallet(other)),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(FundsError::InvalidInput(_))));
    assert_eq!(ledger.assignments.load(Ordering::SeqCst), 1);
    let stored = ledger.inner.get_project(project).await.unwrap();
    assert_eq!(stored.contractor, CONTRACTOR);
}

#[tokio::test]
async fn test_funding_status_follows_donations() {
    let (_, service) = service();
    let created = service
        .create_project(NewProject::new("Dam Construction", "10", "Ha Mphele dam"))
        .await
        .unwrap();
    assert_eq!(created.mirror, MirrorOutcome::Skipped);

    let projects = service.list_projects().await.unwrap();
    assert_eq!(projects[0].funding_status(), FundingStatus::NotFunded);
    assert_eq!(projects[0].funding_status().label(), "No");

    service.fund_project(created.id, "4").await.unwrap();
    service.fund_project(created.id, "2.5").await.unwrap();
    let projects = service.list_projects().await.unwrap();
    assert_eq!(projects[0].amount_received, ether(13) / U256::from(2));
    assert_eq!(projects[0].funding_status().label(), "Accepting Funds");

    service.fund_project(created.id, "3.5").await.unwrap();
    let projects = service.list_projects().await.unwrap();
    assert_eq!(projects[0].funding_status().label(), "Yes");
}

#[tokio::test]
async fn test_create_project_validation() {
    let (_, service) = service();

    let missing_name = service.create_project(NewProject::new("  ", "1", "")).await;
    assert!(matches!(missing_name, Err(FundsError::InvalidInput(_))));

    let zero_budget = service.create_project(NewProject::new("Road", "0", "")).await;
    assert!(matches!(zero_budget, Err(FundsError::InvalidInput(_))));

    let bad_budget = service.create_project(NewProject::new("Road", "ten", "")).await;
    assert!(bad_budget.is_err());

    assert!(service.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_government_defaults_to_signer() {
    let (_, service) = service();
    assert_eq!(service.government(), DEV_SIGNER);

    let service = service.with_government(CONTRACTOR);
    assert_eq!(service.government(), CONTRACTOR);
}

#[tokio::test]
async fn test_expense_needs_contract_balance() {
    let (ledger, service) = service();
    let project = service
        .create_project(NewProject::new("Clinic", "5", ""))
        .await
        .unwrap()
        .id;
    service.fund_project(project, "1").await.unwrap();

    let too_much = service.add_expense(project, PAYEE, "Bricks", "2").await;
    assert!(matches!(too_much, Err(FundsError::InsufficientBalance)));

    service.add_expense(project, PAYEE, "Bricks", "0.75").await.unwrap();
    assert_eq!(ledger.balance().unwrap(), ether(1) / U256::from(4));

    let expenses = service.list_expenses(project).await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "Bricks");
    assert_eq!(expenses[0].payee, PAYEE.parse::<Address>().unwrap());
}

#[tokio::test]
async fn test_expense_requires_every_field() {
    let (_, service) = service();
    let project = service.create_project(NewProject::new("Clinic", "5", "")).await.unwrap().id;

    for (payee, description, amount) in [("", "Bricks", "1"), (PAYEE, " ", "1"), (PAYEE, "Bricks", "")] {
        let result = service.add_expense(project, payee, description, amount).await;
        assert!(matches!(result, Err(FundsError::InvalidInput(_))));
    }
}

#[tokio::test]
async fn test_contractor_assignment_and_payment() {
    let (_, service) = service();
    let project = service.create_project(NewProject::new("Bridge", "3", "")).await.unwrap().id;
    service.fund_project(project, "3").await.unwrap();

    let contractor = service
        .create_contractor("Acme Builders", "Civil works", "Bridges and roads", &CONTRACTOR.to_string())
        .await
        .unwrap();
    assert_eq!(contractor.id, Some(U256::ZERO));

    service
        .assign_contractor(project, ContractorRef::Id(U256::ZERO))
        .await
        .unwrap();

    let again = service
        .assign_contractor(project, ContractorRef::Wallet(CONTRACTOR))
        .await;
    assert!(matches!(again, Err(FundsError::InvalidInput(_))));

    service.pay_contractor(project, "3").await.unwrap();

    let details = service.project_details(project).await.unwrap();
    assert_eq!(details.contractor.map(|c| c.name), Some("Acme Builders".to_string()));
    assert_eq!(details.expenses.len(), 1);
    assert_eq!(details.expenses[0].payee, CONTRACTOR);
    assert!(details.project.completed);
}

#[tokio::test]
async fn test_contractor_ref_parsing() {
    assert_eq!("7".parse::<ContractorRef>().unwrap(), ContractorRef::Id(U256::from(7)));
    assert_eq!(
        CONTRACTOR.to_string().parse::<ContractorRef>().unwrap(),
        ContractorRef::Wallet(CONTRACTOR)
    );
    assert!("seven".parse::<ContractorRef>().is_err());
    assert!("0x123".parse::<ContractorRef>().is_err());
}

#[tokio::test]
async fn test_project_details_not_found() {
    let (_, service) = service();
    match service.project_details(U256::from(3)).await {
        Err(FundsError::NotFound(what)) => assert_eq!(what, "Project 3"),
        other => panic!("Expected NotFound, got {:?}", other.map(|d| d.project.name)),
    }
}

#[tokio::test]
async fn test_project_dates() {
    let (ledger, service) = service();
    let project = service.create_project(NewProject::new("Road", "1", "")).await.unwrap().id;

    service
        .set_project_dates(project, "2024-01-01", "2024-06-30")
        .await
        .unwrap();
    let stored = ledger.get_project(project).await.unwrap();
    assert_eq!(stored.start_date, 1_704_067_200);
    assert_eq!(stored.end_date, 1_719_705_600);

    let backwards = service.set_project_dates(project, "2024-06-30", "2024-01-01").await;
    assert!(matches!(backwards, Err(FundsError::InvalidInput(_))));
}

#[tokio::test]
async fn test_roles() {
    let (ledger, service) = service();
    let user = CONTRACTOR.to_string();

    let unknown = service.assign_role(&user, "manager").await;
    assert!(matches!(unknown, Err(FundsError::ContractRevert(ref reason)) if reason == "User does not exist"));

    service.add_user(&user).await.unwrap();
    service.assign_role(&user, "manager").await.unwrap();
    assert_eq!(ledger.role_of(CONTRACTOR).unwrap(), Some(role_hash("manager")));

    service.revoke_role(&user).await.unwrap();
    assert_eq!(ledger.role_of(CONTRACTOR).unwrap(), None);
}

#[tokio::test]
async fn test_mirror_receives_each_new_project() {
    let ledger = Arc::new(MemoryLedger::new());
    let mirror = Arc::new(RecordingMirror::default());
    let service = FundsService::new(ledger).with_mirror(mirror.clone());

    service.create_project(NewProject::new("Dam", "10", "Water")).await.unwrap();
    service.create_project(NewProject::new("Bridge", "2", "")).await.unwrap();

    let list = service.mirrored_projects().await.unwrap();
    assert_eq!(list.total, 2);
    let documents = list.documents;
    let ids: Vec<&str> = documents.iter().map(|d| d.project_id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1"]);
    assert_eq!(documents[0].description, "Water");
}

#[tokio::test]
async fn test_mirrored_projects_without_store() {
    let (_, service) = service();
    assert!(matches!(service.mirrored_projects().await, Err(FundsError::ConfigError(_))));
}

#[tokio::test]
async fn test_concurrent_donations_all_land() {
    let (ledger, service) = service();
    let service = Arc::new(service);
    let project = service.create_project(NewProject::new("Dam", "100", "")).await.unwrap().id;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.fund_project(project, "1").await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(ledger.balance().unwrap(), ether(10));
    let projects = service.list_projects().await.unwrap();
    assert_eq!(projects[0].amount_received, ether(10));
}
