use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use staffdesk_directory_schema::{employees, tasks, users};
use staffdesk_domain::code::{EmployeeCode, TaskId};

use crate::domain::repository::{EmployeeRepository, TaskRepository, UserProjectionRepository};
use crate::domain::types::{Employee, EmployeeStatus, Task, TaskStatus, UserProjection};
use crate::error::DirectoryServiceError;

// ── Employee repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: std::sync::Arc<DatabaseConnection>,
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DirectoryServiceError> {
        let model = employees::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find employee by id")?;
        model.map(employee_from_model).transpose()
    }

    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Employee>, DirectoryServiceError> {
        let model = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .filter(employees::Column::Status.eq(EmployeeStatus::Active.as_str()))
            .one(self.db.as_ref())
            .await
            .context("find active employee by email")?;
        model.map(employee_from_model).transpose()
    }

    async fn find_active_by_code(
        &self,
        code: &EmployeeCode,
    ) -> Result<Option<Employee>, DirectoryServiceError> {
        let model = employees::Entity::find()
            .filter(employees::Column::EmployeeCode.eq(code.as_str()))
            .filter(employees::Column::Status.eq(EmployeeStatus::Active.as_str()))
            .one(self.db.as_ref())
            .await
            .context("find active employee by code")?;
        model.map(employee_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<Employee>, DirectoryServiceError> {
        let models = employees::Entity::find()
            .filter(employees::Column::Status.eq(EmployeeStatus::Active.as_str()))
            .order_by_asc(employees::Column::EmployeeCode)
            .all(self.db.as_ref())
            .await
            .context("list active employees")?;
        models.into_iter().map(employee_from_model).collect()
    }

    async fn list_code_numbers(&self) -> Result<Vec<u32>, DirectoryServiceError> {
        // Tombstones included: numbering never reuses a suffix.
        let codes: Vec<String> = employees::Entity::find()
            .select_only()
            .column(employees::Column::EmployeeCode)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .context("list employee code suffixes")?;
        Ok(codes
            .iter()
            .filter_map(|c| EmployeeCode::parse(c))
            .map(|c| c.number())
            .collect())
    }

    async fn create_with_projection(
        &self,
        employee: &Employee,
        user: &UserProjection,
    ) -> Result<(), DirectoryServiceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let employee = employee.clone();
                let user = user.clone();
                Box::pin(async move {
                    employee_to_active_model(&employee).insert(txn).await?;
                    users::Entity::insert(projection_to_active_model(&user))
                        .on_conflict(projection_upsert_conflict())
                        .exec_without_returning(txn)
                        .await?;
                    Ok(())
                })
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(sea_orm::TransactionError::Transaction(e))
            | Err(sea_orm::TransactionError::Connection(e)) => {
                Err(employee_write_error(e, "create employee with projection"))
            }
        }
    }

    async fn update(&self, employee: &Employee) -> Result<(), DirectoryServiceError> {
        employee_to_active_model(employee)
            .update(self.db.as_ref())
            .await
            .map_err(|e| employee_write_error(e, "update employee"))?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: EmployeeStatus,
    ) -> Result<bool, DirectoryServiceError> {
        let result = employees::Entity::update_many()
            .filter(employees::Column::Id.eq(id))
            .col_expr(
                employees::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            )
            .col_expr(
                employees::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .exec(self.db.as_ref())
            .await
            .context("set employee status")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError> {
        let result = employees::Entity::delete_many()
            .filter(employees::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await
            .context("delete employees by email")?;
        Ok(result.rows_affected)
    }
}

/// Map a write failure onto the partial unique indexes over active rows.
fn employee_write_error(e: DbErr, what: &'static str) -> DirectoryServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("employee_code") => {
            DirectoryServiceError::DuplicateCode
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => DirectoryServiceError::DuplicateEmail,
        _ => DirectoryServiceError::Internal(anyhow::Error::new(e).context(what)),
    }
}

fn employee_from_model(model: employees::Model) -> Result<Employee, DirectoryServiceError> {
    let code = EmployeeCode::parse(&model.employee_code).ok_or_else(|| {
        DirectoryServiceError::Internal(anyhow::anyhow!(
            "malformed employee code in store: {}",
            model.employee_code
        ))
    })?;
    Ok(Employee {
        id: model.id,
        code,
        email: model.email,
        name: model.name,
        phone: model.phone,
        dob: model.dob,
        blood_group: model.blood_group,
        department: model.department,
        role: model.role,
        designation: model.designation,
        working_project: model.working_project,
        joining_date: model.joining_date,
        location: model.location,
        work_format: model.work_format,
        nationality: model.nationality,
        position: model.position,
        status: EmployeeStatus::from_str(&model.status),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn employee_to_active_model(employee: &Employee) -> employees::ActiveModel {
    employees::ActiveModel {
        id: Set(employee.id),
        employee_code: Set(employee.code.as_str().to_owned()),
        email: Set(employee.email.clone()),
        name: Set(employee.name.clone()),
        phone: Set(employee.phone.clone()),
        dob: Set(employee.dob.clone()),
        blood_group: Set(employee.blood_group.clone()),
        department: Set(employee.department.clone()),
        role: Set(employee.role.clone()),
        designation: Set(employee.designation.clone()),
        working_project: Set(employee.working_project.clone()),
        joining_date: Set(employee.joining_date.clone()),
        location: Set(employee.location.clone()),
        work_format: Set(employee.work_format.clone()),
        nationality: Set(employee.nationality.clone()),
        position: Set(employee.position.clone()),
        status: Set(employee.status.as_str().to_owned()),
        created_at: Set(employee.created_at),
        updated_at: Set(employee.updated_at),
    }
}

// ── User projection repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserProjectionRepository {
    pub db: std::sync::Arc<DatabaseConnection>,
}

impl UserProjectionRepository for DbUserProjectionRepository {
    async fn find_by_uid(
        &self,
        uid: Uuid,
    ) -> Result<Option<UserProjection>, DirectoryServiceError> {
        let model = users::Entity::find_by_id(uid)
            .one(self.db.as_ref())
            .await
            .context("find user projection by uid")?;
        model.map(projection_from_model).transpose()
    }

    async fn upsert(&self, user: &UserProjection) -> Result<(), DirectoryServiceError> {
        users::Entity::insert(projection_to_active_model(user))
            .on_conflict(projection_upsert_conflict())
            .exec_without_returning(self.db.as_ref())
            .await
            .context("upsert user projection")?;
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, DirectoryServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await
            .context("delete user projections by email")?;
        Ok(result.rows_affected)
    }
}

fn projection_from_model(model: users::Model) -> Result<UserProjection, DirectoryServiceError> {
    let code = EmployeeCode::parse(&model.employee_code).ok_or_else(|| {
        DirectoryServiceError::Internal(anyhow::anyhow!(
            "malformed employee code in projection: {}",
            model.employee_code
        ))
    })?;
    Ok(UserProjection {
        uid: model.uid,
        email: model.email,
        name: model.name,
        code,
        role: model.role,
        avatar_text: model.avatar_text,
    })
}

fn projection_to_active_model(user: &UserProjection) -> users::ActiveModel {
    users::ActiveModel {
        uid: Set(user.uid),
        email: Set(user.email.clone()),
        name: Set(user.name.clone()),
        employee_code: Set(user.code.as_str().to_owned()),
        role: Set(user.role.clone()),
        avatar_text: Set(user.avatar_text.clone()),
        updated_at: Set(Utc::now()),
    }
}

fn projection_upsert_conflict() -> OnConflict {
    OnConflict::column(users::Column::Uid)
        .update_columns([
            users::Column::Email,
            users::Column::Name,
            users::Column::EmployeeCode,
            users::Column::Role,
            users::Column::AvatarText,
            users::Column::UpdatedAt,
        ])
        .to_owned()
}

// ── Task repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTaskRepository {
    pub db: std::sync::Arc<DatabaseConnection>,
}

impl TaskRepository for DbTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DirectoryServiceError> {
        let model = tasks::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find task by id")?;
        model.map(task_from_model).transpose()
    }

    async fn find_by_task_id(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<Task>, DirectoryServiceError> {
        let model = tasks::Entity::find()
            .filter(tasks::Column::TaskId.eq(task_id.as_str()))
            .one(self.db.as_ref())
            .await
            .context("find task by task id")?;
        model.map(task_from_model).transpose()
    }

    async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, DirectoryServiceError> {
        let mut query = tasks::Entity::find();
        if let Some(status) = status {
            query = query.filter(tasks::Column::Status.eq(status.as_str()));
        }
        let models = query.all(self.db.as_ref()).await.context("list tasks")?;
        models.into_iter().map(task_from_model).collect()
    }

    async fn list_task_numbers(&self) -> Result<Vec<u32>, DirectoryServiceError> {
        let ids: Vec<String> = tasks::Entity::find()
            .select_only()
            .column(tasks::Column::TaskId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .context("list task id suffixes")?;
        Ok(ids
            .iter()
            .filter_map(|i| TaskId::parse(i))
            .map(|i| i.number())
            .collect())
    }

    async fn list_assigned(&self, employee_id: Uuid) -> Result<Vec<Task>, DirectoryServiceError> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::AssignedEmployeeId.eq(employee_id))
            .all(self.db.as_ref())
            .await
            .context("list tasks assigned to employee")?;
        models.into_iter().map(task_from_model).collect()
    }

    async fn list_unlinked(&self) -> Result<Vec<Task>, DirectoryServiceError> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::AssignedEmployeeId.is_null())
            .all(self.db.as_ref())
            .await
            .context("list unlinked tasks")?;
        models.into_iter().map(task_from_model).collect()
    }

    async fn create(&self, task: &Task) -> Result<(), DirectoryServiceError> {
        task_to_active_model(task)
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    DirectoryServiceError::DuplicateTaskId
                }
                _ => DirectoryServiceError::Internal(anyhow::Error::new(e).context("create task")),
            })?;
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<(), DirectoryServiceError> {
        task_to_active_model(task)
            .update(self.db.as_ref())
            .await
            .context("update task")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DirectoryServiceError> {
        let result = tasks::Entity::delete_many()
            .filter(tasks::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .context("delete task")?;
        Ok(result.rows_affected > 0)
    }
}

fn task_from_model(model: tasks::Model) -> Result<Task, DirectoryServiceError> {
    let task_id = TaskId::parse(&model.task_id).ok_or_else(|| {
        DirectoryServiceError::Internal(anyhow::anyhow!(
            "malformed task id in store: {}",
            model.task_id
        ))
    })?;
    Ok(Task {
        id: model.id,
        task_id,
        title: model.title,
        description: model.description,
        assigned_employee_id: model.assigned_employee_id,
        assigned_to: model.assigned_to,
        status: TaskStatus::from_kebab_case(&model.status).unwrap_or_default(),
        created_at: model.created_at,
        sprint_days: model.sprint_days.max(0) as u32,
        end_date: model.end_date,
        updated_at: model.updated_at,
    })
}

fn task_to_active_model(task: &Task) -> tasks::ActiveModel {
    tasks::ActiveModel {
        id: Set(task.id),
        task_id: Set(task.task_id.as_str().to_owned()),
        title: Set(task.title.clone()),
        description: Set(task.description.clone()),
        assigned_employee_id: Set(task.assigned_employee_id),
        assigned_to: Set(task.assigned_to.clone()),
        status: Set(task.status.as_str().to_owned()),
        created_at: Set(task.created_at),
        sprint_days: Set(task.sprint_days as i32),
        end_date: Set(task.end_date),
        updated_at: Set(task.updated_at),
    }
}
