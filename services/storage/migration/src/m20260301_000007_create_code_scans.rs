use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CodeScans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CodeScans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CodeScans::Code).string_len(9).not_null())
                    .col(ColumnDef::new(CodeScans::EntryId).uuid())
                    .col(ColumnDef::new(CodeScans::ScannedBy).uuid().not_null())
                    .col(ColumnDef::new(CodeScans::Action).string_len(32).not_null())
                    .col(ColumnDef::new(CodeScans::IsValid).boolean().not_null())
                    .col(
                        ColumnDef::new(CodeScans::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CodeScans::Table, CodeScans::EntryId)
                            .to(StorageEntries::Table, StorageEntries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Recent-scans listing.
        manager
            .create_index(
                Index::create()
                    .table(CodeScans::Table)
                    .col(CodeScans::ScannedAt)
                    .name("idx_code_scans_scanned_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CodeScans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CodeScans {
    Table,
    Id,
    Code,
    EntryId,
    ScannedBy,
    Action,
    IsValid,
    ScannedAt,
}

#[derive(Iden)]
enum StorageEntries {
    Table,
    Id,
}
