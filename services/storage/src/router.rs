use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use sanrakshan_core::health::{healthz, readyz};
use sanrakshan_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    accounts::{confirm_password_reset, create_account, get_me, request_password_reset},
    codes::{claim_code, verify_code},
    entries::{create_entry, get_entry, list_entries},
    staff::{entry_summary, list_scans},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/accounts", post(create_account))
        .route("/accounts/@me", get(get_me))
        .route(
            "/accounts/password-reset",
            post(request_password_reset).patch(confirm_password_reset),
        )
        // Student entries
        .route("/entries", post(create_entry).get(list_entries))
        .route("/entries/{entry_id}", get(get_entry))
        // Staff
        .route("/codes/{code}", get(verify_code))
        .route("/codes/{code}/claim", post(claim_code))
        .route("/staff/entries/summary", get(entry_summary))
        .route("/staff/scans", get(list_scans))
        .with_state(state)
        // Added last runs first: the id is set before tracing and echoed on the way out
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
