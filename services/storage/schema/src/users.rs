use sea_orm::entity::prelude::*;

/// Account record for students and staff.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// argon2 PHC string.
    pub password_hash: String,
    pub role: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student_profiles::Entity")]
    StudentProfile,
    #[sea_orm(has_many = "super::storage_entries::Entity")]
    StorageEntries,
    #[sea_orm(has_many = "super::password_reset_codes::Entity")]
    PasswordResetCodes,
}

impl Related<super::student_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl Related<super::storage_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageEntries.def()
    }
}

impl Related<super::password_reset_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResetCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
