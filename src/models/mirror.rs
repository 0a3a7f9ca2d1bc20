use serde::{Deserialize, Serialize};

/// Off-chain copy of a project's metadata, keyed by the on-chain id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirroredProject {
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
}

/// One page of project documents; `total` counts every match in the collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<MirroredProject>,
}
