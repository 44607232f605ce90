use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_student_profiles;
mod m20260301_000003_create_storage_entries;
mod m20260301_000004_create_validation_codes;
mod m20260301_000005_create_password_reset_codes;
mod m20260301_000006_create_outbox_events;
mod m20260301_000007_create_code_scans;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_student_profiles::Migration),
            Box::new(m20260301_000003_create_storage_entries::Migration),
            Box::new(m20260301_000004_create_validation_codes::Migration),
            Box::new(m20260301_000005_create_password_reset_codes::Migration),
            Box::new(m20260301_000006_create_outbox_events::Migration),
            Box::new(m20260301_000007_create_code_scans::Migration),
        ]
    }
}
