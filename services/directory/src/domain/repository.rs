#![allow(async_fn_in_trait)]

use uuid::Uuid;

use staffdesk_domain::code::{EmployeeCode, TaskId};

use crate::domain::types::{Employee, EmployeeStatus, Task, TaskStatus, UserProjection};
use crate::error::DirectoryServiceError;

/// Repository for employee documents.
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DirectoryServiceError>;

    /// Exact, case-sensitive email match over non-tombstoned rows.
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Employee>, DirectoryServiceError>;

    /// Code match over non-tombstoned rows.
    async fn find_active_by_code(
        &self,
        code: &EmployeeCode,
    ) -> Result<Option<Employee>, DirectoryServiceError>;

    /// Active employees, ordered by code.
    async fn list(&self) -> Result<Vec<Employee>, DirectoryServiceError>;

    /// Numeric suffixes of every code ever assigned, tombstones included —
    /// auto-numbering is max + 1 over all of them.
    async fn list_code_numbers(&self) -> Result<Vec<u32>, DirectoryServiceError>;

    /// Insert the employee document and its user projection in one store
    /// transaction, re-checking active-email/code uniqueness under the
    /// store's unique indexes. Uniqueness violations surface as
    /// `DuplicateEmail` / `DuplicateCode`.
    async fn create_with_projection(
        &self,
        employee: &Employee,
        user: &UserProjection,
    ) -> Result<(), DirectoryServiceError>;

    async fn update(&self, employee: &Employee) -> Result<(), DirectoryServiceError>;

    /// Flip the status marker. Returns `false` when the row is gone.
    async fn set_status(
        &self,
        id: Uuid,
        status: EmployeeStatus,
    ) -> Result<bool, DirectoryServiceError>;

    /// Remove every employee document with this email (provisioning retries
    /// can leave several). Returns the number of rows removed.
    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError>;
}

/// Repository for the denormalized post-login projections.
pub trait UserProjectionRepository: Send + Sync {
    async fn find_by_uid(&self, uid: Uuid)
        -> Result<Option<UserProjection>, DirectoryServiceError>;

    /// Insert or overwrite the projection keyed by identity uid.
    async fn upsert(&self, user: &UserProjection) -> Result<(), DirectoryServiceError>;

    /// Remove every projection with this email. Returns rows removed.
    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError>;
}

/// Repository for task documents.
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DirectoryServiceError>;
    async fn find_by_task_id(&self, task_id: &TaskId)
        -> Result<Option<Task>, DirectoryServiceError>;
    async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, DirectoryServiceError>;

    /// Numeric suffixes of every task id, for max + 1 auto-numbering.
    async fn list_task_numbers(&self) -> Result<Vec<u32>, DirectoryServiceError>;

    /// Tasks linked to an employee by reference.
    async fn list_assigned(&self, employee_id: Uuid) -> Result<Vec<Task>, DirectoryServiceError>;

    /// Legacy rows with no employee reference, candidates for label
    /// reconciliation.
    async fn list_unlinked(&self) -> Result<Vec<Task>, DirectoryServiceError>;

    async fn create(&self, task: &Task) -> Result<(), DirectoryServiceError>;
    async fn update(&self, task: &Task) -> Result<(), DirectoryServiceError>;

    /// Delete a task. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, DirectoryServiceError>;
}

/// Failure reasons the provisioning protocol branches on. Anything else is
/// `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity not found")]
    NotFound,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("wrong credential")]
    WrongCredential,
    #[error("identity provider failure")]
    Internal(#[from] anyhow::Error),
}

/// Port to the external login-identity service.
pub trait IdentityProvider: Send + Sync {
    /// Create an identity. Fails with `EmailAlreadyRegistered` when the
    /// email is taken.
    async fn create(&self, email: &str, password: &str) -> Result<Uuid, IdentityError>;

    /// Verify credentials, returning the identity uid. Fails with
    /// `NotFound` or `WrongCredential`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Uuid, IdentityError>;

    /// Look up an identity by email without credentials (admin-side call).
    async fn find_by_email(&self, email: &str) -> Result<Option<Uuid>, IdentityError>;

    /// Rotate email and/or password in place, keeping the uid. No active
    /// session required.
    async fn update_credentials(
        &self,
        uid: Uuid,
        email: &str,
        password: &str,
    ) -> Result<(), IdentityError>;

    /// Delete an identity. Returns `false` when it was already gone.
    async fn delete(&self, uid: Uuid) -> Result<bool, IdentityError>;
}

impl From<IdentityError> for DirectoryServiceError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Internal(inner) => Self::Internal(inner),
            // Branch-worthy reasons must be handled at the call site;
            // reaching here means a protocol step saw a reason it cannot
            // recover from.
            IdentityError::NotFound | IdentityError::WrongCredential => Self::InvalidCredential,
            IdentityError::EmailAlreadyRegistered => Self::IdentityConflict,
        }
    }
}
