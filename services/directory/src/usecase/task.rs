//! Task management: creation with sprint-window derivation, partial
//! updates, and per-employee listing that reconciles legacy label-only
//! rows back to an employee reference.

use std::cmp::Reverse;

use chrono::Utc;
use uuid::Uuid;

use staffdesk_domain::assignment::{MatchTier, reconcile_by_label};
use staffdesk_domain::code::{TaskId, next_number};
use staffdesk_domain::validate::{is_valid_display_date, parse_display_date, sprint_end_date};

use crate::domain::repository::{EmployeeRepository, TaskRepository};
use crate::domain::types::{Employee, EmployeeStatus, Task, TaskStatus};
use crate::error::DirectoryServiceError;

/// Newest first by creation date, undated rows last, ties broken by task
/// id so the order is stable across requests.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (Reverse(t.created_at), t.task_id.clone()));
}

// ── CreateTask ───────────────────────────────────────────────────────────────

pub struct CreateTaskInput {
    pub title: String,
    pub description: String,
    /// 4-digit id suffix; auto-numbered (max + 1) when absent.
    pub task_digits: Option<String>,
    pub assigned_employee_id: Option<Uuid>,
    pub status: Option<String>,
    /// `dd/mm/yyyy`; defaults to today.
    pub created_at: Option<String>,
    pub sprint_days: u32,
}

pub struct CreateTaskUseCase<T, E> {
    pub tasks: T,
    pub employees: E,
}

impl<T, E> CreateTaskUseCase<T, E>
where
    T: TaskRepository,
    E: EmployeeRepository,
{
    pub async fn execute(&self, input: CreateTaskInput) -> Result<Task, DirectoryServiceError> {
        if input.title.trim().is_empty() {
            return Err(DirectoryServiceError::MissingData);
        }

        let task_id = match &input.task_digits {
            Some(digits) => {
                let task_id =
                    TaskId::from_digits(digits).ok_or(DirectoryServiceError::InvalidTaskId)?;
                if self.tasks.find_by_task_id(&task_id).await?.is_some() {
                    return Err(DirectoryServiceError::DuplicateTaskId);
                }
                task_id
            }
            None => {
                let numbers = self.tasks.list_task_numbers().await?;
                TaskId::from_number(next_number(numbers))
                    .ok_or_else(|| anyhow::anyhow!("task id space exhausted"))?
            }
        };

        let status = match input.status.as_deref() {
            Some(s) => {
                TaskStatus::from_kebab_case(s).ok_or(DirectoryServiceError::InvalidTaskStatus)?
            }
            None => TaskStatus::default(),
        };

        let created_at = match input.created_at.as_deref() {
            Some(s) => {
                if !is_valid_display_date(s) {
                    return Err(DirectoryServiceError::InvalidDate);
                }
                Some(parse_display_date(s).ok_or(DirectoryServiceError::InvalidDate)?)
            }
            None => Some(Utc::now().date_naive()),
        };
        let end_date = match created_at {
            Some(d) => Some(
                sprint_end_date(d, input.sprint_days).ok_or(DirectoryServiceError::InvalidDate)?,
            ),
            None => None,
        };

        // Linking is by reference; the label is derived for display and for
        // stores that predate the reference column.
        let assigned_to = match input.assigned_employee_id {
            Some(employee_id) => Some(self.resolve_label(employee_id).await?),
            None => None,
        };

        let task = Task {
            id: Uuid::now_v7(),
            task_id,
            title: input.title.trim().to_owned(),
            description: input.description,
            assigned_employee_id: input.assigned_employee_id,
            assigned_to,
            status,
            created_at,
            sprint_days: input.sprint_days,
            end_date,
            updated_at: Utc::now(),
        };
        self.tasks.create(&task).await?;
        Ok(task)
    }

    async fn resolve_label(&self, employee_id: Uuid) -> Result<String, DirectoryServiceError> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .filter(|e| e.status == EmployeeStatus::Active)
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;
        Ok(employee.display_label())
    }
}

// ── UpdateTask ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` unassigns, `Some(Some(id))` re-links.
    pub assigned_employee_id: Option<Option<Uuid>>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub sprint_days: Option<u32>,
}

pub struct UpdateTaskUseCase<T, E> {
    pub tasks: T,
    pub employees: E,
}

impl<T, E> UpdateTaskUseCase<T, E>
where
    T: TaskRepository,
    E: EmployeeRepository,
{
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateTaskInput,
    ) -> Result<Task, DirectoryServiceError> {
        let mut task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(DirectoryServiceError::TaskNotFound)?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(DirectoryServiceError::MissingData);
            }
            task.title = title.trim().to_owned();
        }
        if let Some(description) = input.description {
            task.description = description;
        }
        if let Some(status) = input.status.as_deref() {
            task.status = TaskStatus::from_kebab_case(status)
                .ok_or(DirectoryServiceError::InvalidTaskStatus)?;
        }
        if let Some(created_at) = input.created_at.as_deref() {
            if !is_valid_display_date(created_at) {
                return Err(DirectoryServiceError::InvalidDate);
            }
            task.created_at =
                Some(parse_display_date(created_at).ok_or(DirectoryServiceError::InvalidDate)?);
        }
        if let Some(sprint_days) = input.sprint_days {
            // Stored as a 32-bit count; undated rows skip the window check
            // below, so bound it here.
            if i32::try_from(sprint_days).is_err() {
                return Err(DirectoryServiceError::InvalidDate);
            }
            task.sprint_days = sprint_days;
        }
        // The sprint window is derived, never stored independently of its
        // inputs.
        if input.created_at.is_some() || input.sprint_days.is_some() {
            task.end_date = match task.created_at {
                Some(d) => Some(
                    sprint_end_date(d, task.sprint_days)
                        .ok_or(DirectoryServiceError::InvalidDate)?,
                ),
                None => None,
            };
        }

        if let Some(assignment) = input.assigned_employee_id {
            match assignment {
                Some(employee_id) => {
                    let employee = self
                        .employees
                        .find_by_id(employee_id)
                        .await?
                        .filter(|e| e.status == EmployeeStatus::Active)
                        .ok_or(DirectoryServiceError::EmployeeNotFound)?;
                    task.assigned_employee_id = Some(employee_id);
                    task.assigned_to = Some(employee.display_label());
                }
                None => {
                    task.assigned_employee_id = None;
                    task.assigned_to = None;
                }
            }
        }

        task.updated_at = Utc::now();
        self.tasks.update(&task).await?;
        Ok(task)
    }
}

// ── DeleteTask ───────────────────────────────────────────────────────────────

pub struct DeleteTaskUseCase<T> {
    pub tasks: T,
}

impl<T: TaskRepository> DeleteTaskUseCase<T> {
    pub async fn execute(&self, id: Uuid) -> Result<(), DirectoryServiceError> {
        if self.tasks.delete(id).await? {
            Ok(())
        } else {
            Err(DirectoryServiceError::TaskNotFound)
        }
    }
}

// ── ListTasks ────────────────────────────────────────────────────────────────

pub struct ListTasksUseCase<T> {
    pub tasks: T,
}

impl<T: TaskRepository> ListTasksUseCase<T> {
    pub async fn execute(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, DirectoryServiceError> {
        let mut tasks = self.tasks.list(status).await?;
        sort_for_display(&mut tasks);
        Ok(tasks)
    }
}

// ── ListEmployeeTasks ────────────────────────────────────────────────────────

pub struct ListEmployeeTasksUseCase<T, E> {
    pub tasks: T,
    pub employees: E,
}

impl<T, E> ListEmployeeTasksUseCase<T, E>
where
    T: TaskRepository,
    E: EmployeeRepository,
{
    /// Tasks visible to one employee: rows linked by reference, plus legacy
    /// label-only rows resolved through the reconciliation fallback chain.
    /// An approximate (non-exact) tier is logged, since a label typo can
    /// misroute a task.
    pub async fn execute(&self, employee_id: Uuid) -> Result<Vec<Task>, DirectoryServiceError> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;

        let mut tasks = self.tasks.list_assigned(employee_id).await?;
        tasks.extend(self.reconciled_legacy_tasks(&employee).await?);
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    async fn reconciled_legacy_tasks(
        &self,
        employee: &Employee,
    ) -> Result<Vec<Task>, DirectoryServiceError> {
        let unlinked = self.tasks.list_unlinked().await?;
        let Some((matches, tier)) = reconcile_by_label(
            &unlinked,
            |t| t.assigned_to.as_deref(),
            &employee.code,
            &employee.name,
        ) else {
            return Ok(Vec::new());
        };
        if tier != MatchTier::Exact {
            tracing::warn!(
                code = %employee.code,
                matched = matches.len(),
                ?tier,
                "legacy task labels matched approximately"
            );
        }
        Ok(matches.into_iter().cloned().collect())
    }
}
