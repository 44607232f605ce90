use sea_orm::entity::prelude::*;

/// Retrieval code for a storage entry, stored in display form (`XXXX-XXXX`).
/// Unique among rows with `is_active = true` (partial index).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "validation_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub entry_id: Uuid,
    pub code: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deactivated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::storage_entries::Entity",
        from = "Column::EntryId",
        to = "super::storage_entries::Column::Id",
        on_delete = "Cascade"
    )]
    StorageEntry,
}

impl Related<super::storage_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
