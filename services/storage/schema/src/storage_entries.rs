use sea_orm::entity::prelude::*;

/// One student's batch of stored items.
/// `status` is `active`, `claimed` or `expired`; `claimed_*` are set only when claimed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub claimed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub claimed_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::stored_items::Entity")]
    StoredItems,
    #[sea_orm(has_one = "super::validation_codes::Entity")]
    ValidationCode,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::stored_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoredItems.def()
    }
}

impl Related<super::validation_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValidationCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
