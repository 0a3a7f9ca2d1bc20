//! Off-chain copy of project metadata in a hosted document store.

pub mod appwrite;

pub use appwrite::AppwriteMirror;

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::error::FundsResult;
use crate::models::{DocumentList, MirroredProject};

#[async_trait]
pub trait DocumentMirror: Send + Sync {
    /// Store `{name, description, projectId}` for a project created on-chain.
    async fn add_project(&self, name: &str, description: &str, project_id: U256) -> FundsResult<MirroredProject>;

    async fn list_projects(&self) -> FundsResult<DocumentList>;
}
