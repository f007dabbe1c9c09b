//! Identity provisioning: keeping an employee's login identity and user
//! projection consistent with the profile document across create, update,
//! archive and purge.

use chrono::Utc;
use uuid::Uuid;

use staffdesk_domain::code::{EmployeeCode, next_number};
use staffdesk_domain::credentials::{PasswordConvention, capitalize_name, derive_email};
use staffdesk_domain::validate::{
    is_valid_display_date, is_valid_email, is_valid_name, is_valid_phone,
};

use crate::domain::repository::{
    EmployeeRepository, IdentityError, IdentityProvider, UserProjectionRepository,
};
use crate::domain::types::{DeleteReport, Employee, EmployeeStatus, UserProjection};
use crate::error::DirectoryServiceError;

// ── CreateEmployee ───────────────────────────────────────────────────────────

pub struct CreateEmployeeInput {
    pub name: String,
    /// Login email; derived from the name when absent.
    pub email: Option<String>,
    /// 4-digit code suffix; auto-numbered (max + 1) when absent.
    pub code_digits: Option<String>,
    pub phone: String,
    pub dob: String,
    pub blood_group: String,
    pub department: String,
    pub role: String,
    pub designation: String,
    pub working_project: String,
    pub joining_date: String,
    pub location: String,
    pub work_format: String,
    pub nationality: String,
    pub position: String,
}

pub struct CreateEmployeeUseCase<E, U, I> {
    pub employees: E,
    pub users: U,
    pub identity: I,
    pub email_domain: String,
    pub convention: PasswordConvention,
}

impl<E, U, I> CreateEmployeeUseCase<E, U, I>
where
    E: EmployeeRepository,
    U: UserProjectionRepository,
    I: IdentityProvider,
{
    pub async fn execute(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<Employee, DirectoryServiceError> {
        if !is_valid_name(&input.name) {
            return Err(DirectoryServiceError::InvalidName);
        }
        let name = capitalize_name(input.name.trim());
        if !is_valid_phone(&input.phone) {
            return Err(DirectoryServiceError::InvalidPhone);
        }
        if !is_valid_display_date(&input.dob) || !is_valid_display_date(&input.joining_date) {
            return Err(DirectoryServiceError::InvalidDate);
        }

        let code = match &input.code_digits {
            Some(digits) => EmployeeCode::from_digits(digits)
                .ok_or(DirectoryServiceError::InvalidEmployeeCode)?,
            None => {
                let numbers = self.employees.list_code_numbers().await?;
                EmployeeCode::from_number(next_number(numbers))
                    .ok_or_else(|| anyhow::anyhow!("employee code space exhausted"))?
            }
        };

        let email = match input.email {
            Some(e) => {
                let e = e.trim().to_owned();
                if !is_valid_email(&e) {
                    return Err(DirectoryServiceError::InvalidEmail);
                }
                e
            }
            None => derive_email(&name, &self.email_domain),
        };

        // Pre-flight uniqueness over active rows. Tombstoned employees do
        // not block reuse. The transactional insert below re-checks under
        // the store's unique indexes, so a concurrent create cannot slip
        // past this read.
        if self.employees.find_active_by_email(&email).await?.is_some() {
            return Err(DirectoryServiceError::DuplicateEmail);
        }
        if self.employees.find_active_by_code(&code).await?.is_some() {
            return Err(DirectoryServiceError::DuplicateCode);
        }

        let password = self.convention.derive(&name, &code);
        let uid = provision_identity(&self.identity, &email, &password).await?;

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::now_v7(),
            code,
            email,
            name,
            phone: input.phone,
            dob: input.dob,
            blood_group: input.blood_group,
            department: input.department,
            role: input.role,
            designation: input.designation,
            working_project: input.working_project,
            joining_date: input.joining_date,
            location: input.location,
            work_format: input.work_format,
            nationality: input.nationality,
            position: input.position,
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let user = UserProjection::for_employee(uid, &employee);

        if let Err(e) = self
            .employees
            .create_with_projection(&employee, &user)
            .await
        {
            return Err(match e {
                // A concurrent create won the unique index; the identity
                // belongs to the winner's email either way.
                DirectoryServiceError::DuplicateEmail | DirectoryServiceError::DuplicateCode => e,
                // Identity exists but the documents do not: degraded state,
                // surfaced with everything an operator needs to reconcile.
                _ => DirectoryServiceError::PartialProvision {
                    email: employee.email.clone(),
                    uid,
                },
            });
        }
        Ok(employee)
    }
}

/// Create an identity, treating "already registered with the same derived
/// credentials" as idempotent success and anything else as a conflict the
/// admin must resolve by choosing a different email.
pub(crate) async fn provision_identity<I: IdentityProvider>(
    identity: &I,
    email: &str,
    password: &str,
) -> Result<Uuid, DirectoryServiceError> {
    match identity.create(email, password).await {
        Ok(uid) => Ok(uid),
        Err(IdentityError::EmailAlreadyRegistered) => {
            match identity.authenticate(email, password).await {
                Ok(uid) => Ok(uid),
                Err(IdentityError::WrongCredential) => {
                    Err(DirectoryServiceError::IdentityConflict)
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

// ── GetEmployee / ListEmployees ──────────────────────────────────────────────

pub struct GetEmployeeUseCase<E> {
    pub employees: E,
}

impl<E: EmployeeRepository> GetEmployeeUseCase<E> {
    pub async fn execute(&self, id: Uuid) -> Result<Employee, DirectoryServiceError> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or(DirectoryServiceError::EmployeeNotFound)
    }
}

pub struct ListEmployeesUseCase<E> {
    pub employees: E,
}

impl<E: EmployeeRepository> ListEmployeesUseCase<E> {
    pub async fn execute(&self) -> Result<Vec<Employee>, DirectoryServiceError> {
        self.employees.list().await
    }
}

// ── UpdateEmployee ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub code_digits: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub blood_group: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub designation: Option<String>,
    pub working_project: Option<String>,
    pub joining_date: Option<String>,
    pub location: Option<String>,
    pub work_format: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<String>,
}

impl UpdateEmployeeInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.code_digits.is_none()
            && self.phone.is_none()
            && self.dob.is_none()
            && self.blood_group.is_none()
            && self.department.is_none()
            && self.role.is_none()
            && self.designation.is_none()
            && self.working_project.is_none()
            && self.joining_date.is_none()
            && self.location.is_none()
            && self.work_format.is_none()
            && self.nationality.is_none()
            && self.position.is_none()
    }
}

pub struct UpdateEmployeeUseCase<E, U, I> {
    pub employees: E,
    pub users: U,
    pub identity: I,
    pub convention: PasswordConvention,
}

impl<E, U, I> UpdateEmployeeUseCase<E, U, I>
where
    E: EmployeeRepository,
    U: UserProjectionRepository,
    I: IdentityProvider,
{
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<Employee, DirectoryServiceError> {
        if input.is_empty() {
            return Err(DirectoryServiceError::MissingData);
        }
        let current = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;

        let mut updated = current.clone();
        if let Some(name) = input.name {
            if !is_valid_name(&name) {
                return Err(DirectoryServiceError::InvalidName);
            }
            updated.name = capitalize_name(name.trim());
        }
        if let Some(phone) = input.phone {
            if !is_valid_phone(&phone) {
                return Err(DirectoryServiceError::InvalidPhone);
            }
            updated.phone = phone;
        }
        if let Some(dob) = input.dob {
            if !is_valid_display_date(&dob) {
                return Err(DirectoryServiceError::InvalidDate);
            }
            updated.dob = dob;
        }
        if let Some(joining_date) = input.joining_date {
            if !is_valid_display_date(&joining_date) {
                return Err(DirectoryServiceError::InvalidDate);
            }
            updated.joining_date = joining_date;
        }
        if let Some(email) = input.email {
            let email = email.trim().to_owned();
            if !is_valid_email(&email) {
                return Err(DirectoryServiceError::InvalidEmail);
            }
            updated.email = email;
        }
        if let Some(digits) = input.code_digits {
            updated.code = EmployeeCode::from_digits(&digits)
                .ok_or(DirectoryServiceError::InvalidEmployeeCode)?;
        }
        if let Some(v) = input.blood_group {
            updated.blood_group = v;
        }
        if let Some(v) = input.department {
            updated.department = v;
        }
        if let Some(v) = input.role {
            updated.role = v;
        }
        if let Some(v) = input.designation {
            updated.designation = v;
        }
        if let Some(v) = input.working_project {
            updated.working_project = v;
        }
        if let Some(v) = input.location {
            updated.location = v;
        }
        if let Some(v) = input.work_format {
            updated.work_format = v;
        }
        if let Some(v) = input.nationality {
            updated.nationality = v;
        }
        if let Some(v) = input.position {
            updated.position = v;
        }

        // Uniqueness checks exclude the employee itself.
        if updated.email != current.email {
            if let Some(other) = self.employees.find_active_by_email(&updated.email).await? {
                if other.id != id {
                    return Err(DirectoryServiceError::DuplicateEmail);
                }
            }
        }
        if updated.code != current.code {
            if let Some(other) = self.employees.find_active_by_code(&updated.code).await? {
                if other.id != id {
                    return Err(DirectoryServiceError::DuplicateCode);
                }
            }
        }

        let old_password = self.convention.derive(&current.name, &current.code);
        let new_password = self.convention.derive(&updated.name, &updated.code);
        let rotate = updated.email != current.email || new_password != old_password;

        if rotate {
            match self.identity.find_by_email(&current.email).await {
                Ok(Some(uid)) => {
                    self.identity
                        .update_credentials(uid, &updated.email, &new_password)
                        .await?;
                    self.users
                        .upsert(&UserProjection::for_employee(uid, &updated))
                        .await?;
                }
                // Identity never provisioned or lost: back-fill under the
                // new credentials per the create rules.
                Ok(None) => {
                    let uid =
                        provision_identity(&self.identity, &updated.email, &new_password).await?;
                    self.users
                        .upsert(&UserProjection::for_employee(uid, &updated))
                        .await?;
                }
                Err(e) => return Err(e.into()),
            }
        } else if updated.name != current.name || updated.role != current.role {
            // Projection mirrors name/role; keep it fresh even when the
            // credentials stand.
            if let Ok(Some(uid)) = self.identity.find_by_email(&current.email).await {
                self.users
                    .upsert(&UserProjection::for_employee(uid, &updated))
                    .await?;
            }
        }

        updated.updated_at = Utc::now();
        self.employees.update(&updated).await?;
        Ok(updated)
    }
}

// ── ArchiveEmployee (tombstone) ──────────────────────────────────────────────

pub struct ArchiveEmployeeUseCase<E, U, I> {
    pub employees: E,
    pub users: U,
    pub identity: I,
}

impl<E, U, I> ArchiveEmployeeUseCase<E, U, I>
where
    E: EmployeeRepository,
    U: UserProjectionRepository,
    I: IdentityProvider,
{
    /// Soft-delete: mark the document deleted, remove the identity and the
    /// projections. The tombstoned email/code become reusable; recreating
    /// the employee later provisions a fresh identity (new uid).
    pub async fn execute(&self, id: Uuid) -> Result<(), DirectoryServiceError> {
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;
        if employee.status == EmployeeStatus::Deleted {
            return Ok(());
        }
        delete_identity_best_effort(&self.identity, &employee.email).await;
        self.users.delete_by_email(&employee.email).await?;
        self.employees
            .set_status(id, EmployeeStatus::Deleted)
            .await?;
        Ok(())
    }
}

// ── DeleteEmployee (purge) ───────────────────────────────────────────────────

pub struct DeleteEmployeeUseCase<E, U, I> {
    pub employees: E,
    pub users: U,
    pub identity: I,
}

impl<E, U, I> DeleteEmployeeUseCase<E, U, I>
where
    E: EmployeeRepository,
    U: UserProjectionRepository,
    I: IdentityProvider,
{
    /// Remove the identity, every projection and every employee document
    /// for the employee's email. Tasks are never cascade-deleted. A missing
    /// sub-resource counts as zero, so the operation is idempotent: a
    /// second call reports no additional deletions and does not fail.
    pub async fn execute(&self, id: Uuid) -> Result<DeleteReport, DirectoryServiceError> {
        let Some(employee) = self.employees.find_by_id(id).await? else {
            return Ok(DeleteReport::default());
        };
        let email = employee.email;

        let mut report = DeleteReport::default();
        if delete_identity_best_effort(&self.identity, &email).await {
            report.identities_deleted = 1;
        }
        report.users_deleted = self.users.delete_by_email(&email).await?;
        report.employees_deleted = self.employees.delete_by_email(&email).await?;

        tracing::info!(
            %email,
            identities = report.identities_deleted,
            users = report.users_deleted,
            employees = report.employees_deleted,
            "employee removed"
        );
        Ok(report)
    }
}

/// Find and delete the identity for an email. Failures are logged and
/// swallowed: a missing or undeletable identity must never fail the
/// surrounding archive/delete. Returns whether an identity was removed.
async fn delete_identity_best_effort<I: IdentityProvider>(identity: &I, email: &str) -> bool {
    match identity.find_by_email(email).await {
        Ok(Some(uid)) => match identity.delete(uid).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(%email, %uid, error = %e, "identity delete failed; continuing");
                false
            }
        },
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(%email, error = %e, "identity lookup failed; continuing");
            false
        }
    }
}
