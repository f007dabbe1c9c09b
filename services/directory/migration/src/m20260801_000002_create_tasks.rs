use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tasks::TaskId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).string().not_null())
                    .col(ColumnDef::new(Tasks::AssignedEmployeeId).uuid())
                    .col(ColumnDef::new(Tasks::AssignedTo).string())
                    .col(ColumnDef::new(Tasks::Status).string().not_null())
                    .col(ColumnDef::new(Tasks::CreatedAt).date())
                    .col(ColumnDef::new(Tasks::SprintDays).integer().not_null())
                    .col(ColumnDef::new(Tasks::EndDate).date())
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tasks::Table, Tasks::AssignedEmployeeId)
                            .to(Employees::Table, Employees::Id)
                            // Employee removal orphans the row instead of
                            // cascading; task documents are never deleted
                            // alongside an employee.
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Tasks::Table)
                    .col(Tasks::AssignedEmployeeId)
                    .name("idx_tasks_assigned_employee_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    TaskId,
    Title,
    Description,
    AssignedEmployeeId,
    AssignedTo,
    Status,
    CreatedAt,
    SprintDays,
    EndDate,
    UpdatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
}
