use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use staffdesk_domain::validate::format_display_date;

use crate::domain::types::{Task, TaskStatus};
use crate::error::DirectoryServiceError;
use crate::identity::Identity;
use crate::state::AppState;
use crate::usecase::task::{
    CreateTaskInput, CreateTaskUseCase, DeleteTaskUseCase, ListEmployeeTasksUseCase,
    ListTasksUseCase, UpdateTaskInput, UpdateTaskUseCase,
};

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub assigned_employee_id: Option<String>,
    pub assigned_to: Option<String>,
    pub status: String,
    /// `dd/mm/yyyy` display dates.
    pub created_at: Option<String>,
    pub sprint_days: u32,
    pub end_date: Option<String>,
    #[serde(serialize_with = "staffdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id.to_string(),
            task_id: t.task_id.as_str().to_owned(),
            title: t.title,
            description: t.description,
            assigned_employee_id: t.assigned_employee_id.map(|id| id.to_string()),
            assigned_to: t.assigned_to,
            status: t.status.as_str().to_owned(),
            created_at: t.created_at.map(format_display_date),
            sprint_days: t.sprint_days,
            end_date: t.end_date.map(format_display_date),
            updated_at: t.updated_at,
        }
    }
}

/// Distinguishes an absent field from an explicit `null` in PATCH bodies.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, DirectoryServiceError> {
    raw.map(|s| TaskStatus::from_kebab_case(s).ok_or(DirectoryServiceError::InvalidTaskStatus))
        .transpose()
}

// ── POST /tasks ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub task_id: Option<String>,
    pub assigned_employee_id: Option<Uuid>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub sprint_days: u32,
}

pub async fn create_task(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = CreateTaskUseCase {
        tasks: state.task_repo(),
        employees: state.employee_repo(),
    };
    let task = usecase
        .execute(CreateTaskInput {
            title: body.title,
            description: body.description,
            task_digits: body.task_id.map(|t| {
                let t = t.trim();
                t.strip_prefix("TID-").unwrap_or(t).to_owned()
            }),
            assigned_employee_id: body.assigned_employee_id,
            status: body.status,
            created_at: body.created_at,
            sprint_days: body.sprint_days,
        })
        .await?;
    state.feed.publish("tasks", "created", task.id);
    Ok((StatusCode::CREATED, Json(task.into())))
}

// ── GET /tasks ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
}

pub async fn get_tasks(
    _identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<TaskResponse>>, DirectoryServiceError> {
    let status = parse_status(query.status.as_deref())?;
    let usecase = ListTasksUseCase {
        tasks: state.task_repo(),
    };
    let tasks = usecase.execute(status).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

// ── GET /employees/@me/tasks ─────────────────────────────────────────────────

pub async fn get_my_tasks(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, DirectoryServiceError> {
    use crate::domain::repository::{EmployeeRepository, UserProjectionRepository};

    // The token carries the identity uid; resolve it to the employee
    // document through the projection.
    let projection = state
        .user_repo()
        .find_by_uid(identity.uid)
        .await?
        .ok_or(DirectoryServiceError::InvalidCredential)?;
    let employee = state
        .employee_repo()
        .find_active_by_email(&projection.email)
        .await?
        .ok_or(DirectoryServiceError::EmployeeNotFound)?;

    let usecase = ListEmployeeTasksUseCase {
        tasks: state.task_repo(),
        employees: state.employee_repo(),
    };
    let tasks = usecase.execute(employee.id).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

// ── PATCH /tasks/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absent = unchanged; `null` = unassign; uuid = re-link.
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_employee_id: Option<Option<Uuid>>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub sprint_days: Option<u32>,
}

pub async fn update_task(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = UpdateTaskUseCase {
        tasks: state.task_repo(),
        employees: state.employee_repo(),
    };
    let task = usecase
        .execute(
            id,
            UpdateTaskInput {
                title: body.title,
                description: body.description,
                assigned_employee_id: body.assigned_employee_id,
                status: body.status,
                created_at: body.created_at,
                sprint_days: body.sprint_days,
            },
        )
        .await?;
    state.feed.publish("tasks", "updated", task.id);
    Ok(Json(task.into()))
}

// ── DELETE /tasks/{id} ───────────────────────────────────────────────────────

pub async fn delete_task(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DirectoryServiceError> {
    identity.require_admin()?;
    let usecase = DeleteTaskUseCase {
        tasks: state.task_repo(),
    };
    usecase.execute(id).await?;
    state.feed.publish("tasks", "deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
