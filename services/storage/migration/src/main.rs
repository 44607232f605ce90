use sea_orm_migration::prelude::*;

use sanrakshan_storage_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
