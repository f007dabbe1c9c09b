use sea_orm::entity::prelude::*;

/// Task record. `assigned_employee_id` is the authoritative linkage;
/// `assigned_to` holds the legacy free-text label on rows that predate it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub assigned_employee_id: Option<Uuid>,
    pub assigned_to: Option<String>,
    pub status: String,
    pub created_at: Option<Date>,
    pub sprint_days: i32,
    pub end_date: Option<Date>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::AssignedEmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employee,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
