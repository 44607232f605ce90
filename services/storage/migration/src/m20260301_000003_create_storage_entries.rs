use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StorageEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StorageEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StorageEntries::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(StorageEntries::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(StorageEntries::Notes).text())
                    .col(ColumnDef::new(StorageEntries::StorageLocation).string_len(100))
                    .col(
                        ColumnDef::new(StorageEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StorageEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StorageEntries::ClaimedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(StorageEntries::ClaimedBy).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .from(StorageEntries::Table, StorageEntries::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StorageEntries::Table, StorageEntries::ClaimedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Student listing and the expiry sweep both filter by status.
        manager
            .create_index(
                Index::create()
                    .table(StorageEntries::Table)
                    .col(StorageEntries::OwnerId)
                    .col(StorageEntries::CreatedAt)
                    .name("idx_storage_entries_owner_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(StorageEntries::Table)
                    .col(StorageEntries::Status)
                    .col(StorageEntries::CreatedAt)
                    .name("idx_storage_entries_status_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoredItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoredItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StoredItems::EntryId).uuid().not_null())
                    .col(
                        ColumnDef::new(StoredItems::Description)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StoredItems::Category)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StoredItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(StoredItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StoredItems::Table, StoredItems::EntryId)
                            .to(StorageEntries::Table, StorageEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(StoredItems::Table)
                    .col(StoredItems::EntryId)
                    .name("idx_stored_items_entry_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoredItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StorageEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StorageEntries {
    Table,
    Id,
    OwnerId,
    Status,
    Notes,
    StorageLocation,
    CreatedAt,
    UpdatedAt,
    ClaimedAt,
    ClaimedBy,
}

#[derive(Iden)]
enum StoredItems {
    Table,
    Id,
    EntryId,
    Description,
    Category,
    Quantity,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
