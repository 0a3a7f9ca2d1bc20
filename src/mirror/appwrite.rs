use alloy::primitives::U256;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::json;

use super::DocumentMirror;
use crate::config::MirrorSettings;
use crate::error::{FundsError, FundsResult};
use crate::logging::{log_debug, log_info};
use crate::models::{DocumentList, MirroredProject};

const PROJECT_HEADER: &str = "x-appwrite-project";
const KEY_HEADER: &str = "x-appwrite-key";
const UNIQUE_ID: &str = "unique()";

/// Appwrite REST client for the projects collection.
pub struct AppwriteMirror {
    client: reqwest::Client,
    documents_url: String,
}

impl AppwriteMirror {
    pub fn new(settings: &MirrorSettings) -> FundsResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(PROJECT_HEADER, header_value("appwrite_project", &settings.project)?);
        if let Some(key) = &settings.api_key {
            headers.insert(KEY_HEADER, header_value("appwrite_api_key", key)?);
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            settings.endpoint.trim_end_matches('/'),
            settings.database_id,
            settings.collection_id
        );

        Ok(Self {
            client,
            documents_url,
        })
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    async fn check(response: reqwest::Response) -> FundsResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(FundsError::MirrorError(format!(
            "request failed with status {}: {}",
            status, error_text
        )))
    }
}

fn header_value(key: &str, value: &str) -> FundsResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| FundsError::ConfigError(format!("{} contains invalid characters", key)))
}

#[async_trait]
impl DocumentMirror for AppwriteMirror {
    async fn add_project(&self, name: &str, description: &str, project_id: U256) -> FundsResult<MirroredProject> {
        let document = MirroredProject {
            document_id: None,
            name: name.to_string(),
            description: description.to_string(),
            project_id: project_id.to_string(),
        };
        let body = json!({
            "documentId": UNIQUE_ID,
            "data": document,
        });

        let response = self.client.post(&self.documents_url).json(&body).send().await?;
        let created: MirroredProject = Self::check(response).await?.json().await?;

        log_info(&format!(
            "Mirrored project {} as document {}",
            created.project_id,
            created.document_id.as_deref().unwrap_or("?")
        ));
        Ok(created)
    }

    async fn list_projects(&self) -> FundsResult<DocumentList> {
        let response = self.client.get(&self.documents_url).send().await?;
        let list: DocumentList = Self::check(response).await?.json().await?;
        log_debug(&format!("Document store holds {} projects", list.total));
        Ok(list)
    }
}
