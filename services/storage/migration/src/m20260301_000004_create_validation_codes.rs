use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ValidationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ValidationCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ValidationCodes::EntryId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ValidationCodes::Code)
                            .string_len(9)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ValidationCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ValidationCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ValidationCodes::DeactivatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ValidationCodes::Table, ValidationCodes::EntryId)
                            .to(StorageEntries::Table, StorageEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Active codes are unique; claimed codes may be reissued later.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_validation_codes_active_code \
                 ON validation_codes (code) WHERE is_active",
            )
            .await?;

        // Lookups of inactive codes (verify after claim).
        manager
            .create_index(
                Index::create()
                    .table(ValidationCodes::Table)
                    .col(ValidationCodes::Code)
                    .name("idx_validation_codes_code")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ValidationCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ValidationCodes {
    Table,
    Id,
    EntryId,
    Code,
    IsActive,
    CreatedAt,
    DeactivatedAt,
}

#[derive(Iden)]
enum StorageEntries {
    Table,
    Id,
}
