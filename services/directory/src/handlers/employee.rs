use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Employee;
use crate::error::DirectoryServiceError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::provisioning::{
    ArchiveEmployeeUseCase, CreateEmployeeInput, CreateEmployeeUseCase, DeleteEmployeeUseCase,
    GetEmployeeUseCase, ListEmployeesUseCase, UpdateEmployeeInput, UpdateEmployeeUseCase,
};

#[derive(Serialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub employee_code: String,
    pub email: String,
    pub name: String,
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
    pub status: String,
    #[serde(serialize_with = "staffdesk_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "staffdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id.to_string(),
            employee_code: e.code.as_str().to_owned(),
            email: e.email,
            name: e.name,
            phone: e.phone,
            dob: e.dob,
            blood_group: e.blood_group,
            department: e.department,
            role: e.role,
            designation: e.designation,
            working_project: e.working_project,
            joining_date: e.joining_date,
            location: e.location,
            work_format: e.work_format,
            nationality: e.nationality,
            position: e.position,
            status: e.status.as_str().to_owned(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Accept either the full prefixed code or the bare 4-digit suffix.
fn code_digits(raw: Option<String>) -> Option<String> {
    raw.map(|c| {
        let c = c.trim();
        c.strip_prefix("LSEMP").unwrap_or(c).to_owned()
    })
}

// ── POST /employees ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: Option<String>,
    pub employee_code: Option<String>,
    pub phone: String,
    pub dob: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub working_project: String,
    pub joining_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_format: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub position: String,
}

pub async fn create_employee(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = CreateEmployeeUseCase {
        employees: state.employee_repo(),
        users: state.user_repo(),
        identity: state.identity_provider(),
        email_domain: state.email_domain.clone(),
        convention: state.password_convention,
    };
    let employee = usecase
        .execute(CreateEmployeeInput {
            name: body.name,
            email: body.email,
            code_digits: code_digits(body.employee_code),
            phone: body.phone,
            dob: body.dob,
            blood_group: body.blood_group,
            department: body.department,
            role: body.role,
            designation: body.designation,
            working_project: body.working_project,
            joining_date: body.joining_date,
            location: body.location,
            work_format: body.work_format,
            nationality: body.nationality,
            position: body.position,
        })
        .await?;
    state.feed.publish("employees", "created", employee.id);
    Ok((StatusCode::CREATED, Json(employee.into())))
}

// ── GET /employees ───────────────────────────────────────────────────────────

pub async fn get_employees(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeResponse>>, DirectoryServiceError> {
    let usecase = ListEmployeesUseCase {
        employees: state.employee_repo(),
    };
    let employees = usecase.execute().await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

// ── GET /employees/{id} ──────────────────────────────────────────────────────

pub async fn get_employee(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, DirectoryServiceError> {
    let usecase = GetEmployeeUseCase {
        employees: state.employee_repo(),
    };
    let employee = usecase.execute(id).await?;
    Ok(Json(employee.into()))
}

// ── PATCH /employees/{id} ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub employee_code: Option<String>,
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

pub async fn update_employee(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = UpdateEmployeeUseCase {
        employees: state.employee_repo(),
        users: state.user_repo(),
        identity: state.identity_provider(),
        convention: state.password_convention,
    };
    let employee = usecase
        .execute(
            id,
            UpdateEmployeeInput {
                name: body.name,
                email: body.email,
                code_digits: code_digits(body.employee_code),
                phone: body.phone,
                dob: body.dob,
                blood_group: body.blood_group,
                department: body.department,
                role: body.role,
                designation: body.designation,
                working_project: body.working_project,
                joining_date: body.joining_date,
                location: body.location,
                work_format: body.work_format,
                nationality: body.nationality,
                position: body.position,
            },
        )
        .await?;
    state.feed.publish("employees", "updated", employee.id);
    Ok(Json(employee.into()))
}

// ── POST /employees/{id}/archive ─────────────────────────────────────────────

pub async fn archive_employee(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = ArchiveEmployeeUseCase {
        employees: state.employee_repo(),
        users: state.user_repo(),
        identity: state.identity_provider(),
    };
    usecase.execute(id).await?;
    state.feed.publish("employees", "archived", id);
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /employees/{id} ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteReportResponse {
    pub identities_deleted: u64,
    pub users_deleted: u64,
    pub employees_deleted: u64,
}

pub async fn delete_employee(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteReportResponse>, DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = DeleteEmployeeUseCase {
        employees: state.employee_repo(),
        users: state.user_repo(),
        identity: state.identity_provider(),
    };
    let report = usecase.execute(id).await?;
    state.feed.publish("employees", "deleted", id);
    Ok(Json(DeleteReportResponse {
        identities_deleted: report.identities_deleted,
        users_deleted: report.users_deleted,
        employees_deleted: report.employees_deleted,
    }))
}
