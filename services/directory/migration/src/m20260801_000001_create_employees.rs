use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::EmployeeCode).string().not_null())
                    .col(ColumnDef::new(Employees::Email).string().not_null())
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Phone).string().not_null())
                    .col(ColumnDef::new(Employees::Dob).string().not_null())
                    .col(ColumnDef::new(Employees::BloodGroup).string().not_null())
                    .col(ColumnDef::new(Employees::Department).string().not_null())
                    .col(ColumnDef::new(Employees::Role).string().not_null())
                    .col(ColumnDef::new(Employees::Designation).string().not_null())
                    .col(
                        ColumnDef::new(Employees::WorkingProject)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::JoiningDate).string().not_null())
                    .col(ColumnDef::new(Employees::Location).string().not_null())
                    .col(ColumnDef::new(Employees::WorkFormat).string().not_null())
                    .col(ColumnDef::new(Employees::Nationality).string().not_null())
                    .col(ColumnDef::new(Employees::Position).string().not_null())
                    .col(
                        ColumnDef::new(Employees::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness holds among active employees only; tombstoned rows do
        // not block email/code reuse. Partial indexes need raw SQL.
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX ux_employees_active_email \
             ON employees (email) WHERE status = 'active'",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX ux_employees_active_employee_code \
             ON employees (employee_code) WHERE status = 'active'",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    EmployeeCode,
    Email,
    Name,
    Phone,
    Dob,
    BloodGroup,
    Department,
    Role,
    Designation,
    WorkingProject,
    JoiningDate,
    Location,
    WorkFormat,
    Nationality,
    Position,
    Status,
    CreatedAt,
    UpdatedAt,
}
