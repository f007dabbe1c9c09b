use sea_orm::entity::prelude::*;

/// Employee profile record. `status` distinguishes active rows from
/// tombstones; uniqueness of `employee_code` and `email` is enforced by
/// partial indexes over active rows only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
