use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RadarError>;

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid change type: {0}")]
    InvalidChangeType(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RadarError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::InvalidRegion(_) => "INVALID_REGION",
            Self::InvalidChangeType(_) => "INVALID_CHANGE_TYPE",
            Self::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Mail(_) => "MAIL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for errors caused by caller input rather than the environment.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCategory(_)
                | Self::InvalidRegion(_)
                | Self::InvalidChangeType(_)
                | Self::InvalidTimestamp(_)
                | Self::Validation(_)
        )
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details: None,
        }
    }
}
