use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stored_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    pub description: String,
    pub category: String,
    pub quantity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
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
