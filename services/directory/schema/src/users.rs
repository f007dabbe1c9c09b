use sea_orm::entity::prelude::*;

/// Denormalized post-login projection of employee + identity, keyed by the
/// identity uid. Overwritten on every (re)provision.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: Uuid,
    pub email: String,
    pub name: String,
    pub employee_code: String,
    pub role: String,
    pub avatar_text: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
