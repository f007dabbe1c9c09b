use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use staffdesk_domain::assignment::assignment_label;
use staffdesk_domain::code::{EmployeeCode, TaskId};
use staffdesk_domain::credentials::avatar_text;

/// Employee profile owned by the directory service.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: Uuid,
    pub code: EmployeeCode,
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
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Canonical display label used for task assignment.
    pub fn display_label(&self) -> String {
        assignment_label(&self.code, &self.name)
    }
}

/// Active row or tombstone. Tombstoned employees do not block email/code
/// reuse and cannot log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Deleted,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "deleted" => Self::Deleted,
            _ => Self::Active,
        }
    }
}

/// Denormalized projection of employee + identity for post-login lookup.
#[derive(Debug, Clone)]
pub struct UserProjection {
    pub uid: Uuid,
    pub email: String,
    pub name: String,
    pub code: EmployeeCode,
    pub role: String,
    pub avatar_text: String,
}

impl UserProjection {
    /// Build the projection for an employee once an identity uid is known.
    pub fn for_employee(uid: Uuid, employee: &Employee) -> Self {
        Self {
            uid,
            email: employee.email.clone(),
            name: employee.name.clone(),
            code: employee.code.clone(),
            role: employee.role.clone(),
            avatar_text: avatar_text(&employee.name),
        }
    }

    /// Admins manage employees and tasks; everyone else reads their own data.
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// Task record.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
    /// Authoritative employee linkage; `None` on legacy rows.
    pub assigned_employee_id: Option<Uuid>,
    /// Legacy free-text label, only meaningful when the reference is `None`.
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub created_at: Option<NaiveDate>,
    pub sprint_days: u32,
    pub end_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// What an employee removal actually deleted, per collection. Absent
/// sub-resources count as zero, never as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub identities_deleted: u64,
    pub users_deleted: u64,
    pub employees_deleted: u64,
}
