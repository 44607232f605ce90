use sea_orm::Database;
use tracing::info;

use sanrakshan_core::config::Config;
use sanrakshan_core::tracing::init_tracing;
use sanrakshan_storage::config::StorageConfig;
use sanrakshan_storage::infra::mailer::Mailer;
use sanrakshan_storage::router::build_router;
use sanrakshan_storage::state::AppState;
use sanrakshan_storage::worker::spawn_workers;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = StorageConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = Mailer::from_config(config.mail_relay_url.as_deref(), &config.mail_from);
    if matches!(mailer, Mailer::Log(_)) {
        info!("MAIL_RELAY_URL not set, emails will only be logged");
    }

    let state = AppState { db, mailer };

    // Background jobs: outbox delivery and expiry sweep
    let _workers = spawn_workers(&state, &config);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.storage_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("storage service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
