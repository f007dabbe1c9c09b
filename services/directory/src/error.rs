use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

/// Directory service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("name must contain letters and spaces only")]
    InvalidName,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("phone must be 10 digits")]
    InvalidPhone,
    #[error("dates must be dd/mm/yyyy")]
    InvalidDate,
    #[error("employee code must be 4 digits after the prefix")]
    InvalidEmployeeCode,
    #[error("task id must be 4 digits after the prefix")]
    InvalidTaskId,
    #[error("unknown task status")]
    InvalidTaskStatus,
    #[error("missing data")]
    MissingData,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("forbidden")]
    Forbidden,
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("task not found")]
    TaskNotFound,
    #[error("an active employee with this email already exists")]
    DuplicateEmail,
    #[error("an active employee with this code already exists")]
    DuplicateCode,
    #[error("a task with this id already exists")]
    DuplicateTaskId,
    #[error("email is registered with different credentials; choose a different email")]
    IdentityConflict,
    #[error("identity {uid} for {email} was provisioned but the document write failed")]
    PartialProvision { email: String, uid: Uuid },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DirectoryServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidEmployeeCode => "INVALID_EMPLOYEE_CODE",
            Self::InvalidTaskId => "INVALID_TASK_ID",
            Self::InvalidTaskStatus => "INVALID_TASK_STATUS",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::Forbidden => "FORBIDDEN",
            Self::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::DuplicateCode => "DUPLICATE_CODE",
            Self::DuplicateTaskId => "DUPLICATE_TASK_ID",
            Self::IdentityConflict => "IDENTITY_CONFLICT",
            Self::PartialProvision { .. } => "PARTIAL_PROVISION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for DirectoryServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidName
            | Self::InvalidEmail
            | Self::InvalidPhone
            | Self::InvalidDate
            | Self::InvalidEmployeeCode
            | Self::InvalidTaskId
            | Self::InvalidTaskStatus
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::EmployeeNotFound | Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEmail
            | Self::DuplicateCode
            | Self::DuplicateTaskId
            | Self::IdentityConflict => StatusCode::CONFLICT,
            Self::PartialProvision { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            // Orphaned identity: the uid/email pair is what an operator
            // needs to reconcile by hand.
            Self::PartialProvision { email, uid } => {
                tracing::error!(%email, %uid, kind = "PARTIAL_PROVISION", "orphaned identity");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
