use sea_orm::entity::prelude::*;

/// One staff lookup or claim attempt on a validation code.
///
/// `code` is the normalized input, so lookups of codes that never existed are
/// recorded too. `entry_id` is cleared when the entry is purged. `scanned_by`
/// is the gateway identity and carries no foreign key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "code_scans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub entry_id: Option<Uuid>,
    pub scanned_by: Uuid,
    pub action: String,
    pub is_valid: bool,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::storage_entries::Entity",
        from = "Column::EntryId",
        to = "super::storage_entries::Column::Id",
        on_delete = "SetNull"
    )]
    StorageEntry,
}

impl Related<super::storage_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
