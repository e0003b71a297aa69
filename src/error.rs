use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an import document was refused. The store is untouched in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("the file could not be read as JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("not a valid project file: {0}")]
    Validation(String),
    #[error("project content could not be read: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("project {0} not found")]
    ProjectNotFound(String),
    #[error("there are no projects to export")]
    NoProjects,
    #[error("failed to encode export document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to save export: {0:#}")]
    Sink(anyhow::Error),
}

/// `{ success, error? }` view of an import result for UI layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<Result<T, ImportError>> for ImportResponse {
    fn from(result: Result<T, ImportError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                error: None,
            },
            Err(err) => Self {
                success: false,
                error: Some(err.to_string()),
            },
        }
    }
}
