//! Upload records migration.
//!
//! Creates the `UserUploads` table, keyed by uploader email.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserUploads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserUploads::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserUploads::Name).string().not_null())
                    .col(ColumnDef::new(UserUploads::FileUrl).text().not_null())
                    .col(
                        ColumnDef::new(UserUploads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserUploads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserUploads::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserUploads {
    #[sea_orm(iden = "UserUploads")]
    Table,
    Email,
    Name,
    FileUrl,
    CreatedAt,
    UpdatedAt,
}
