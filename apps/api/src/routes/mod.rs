pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::messages::handlers as messages;
use crate::prospects::handlers as prospects;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Messages API
        .route("/api/v1/messages/generate", post(messages::handle_generate))
        .route(
            "/api/v1/messages/templates",
            get(messages::handle_default_templates).post(messages::handle_create_template),
        )
        .route(
            "/api/v1/messages/templates/variables",
            get(messages::handle_default_template_variables),
        )
        // Prospects API
        .route(
            "/api/v1/prospects/upload-csv",
            post(prospects::handle_upload_csv),
        )
        .route(
            "/api/v1/prospects/validate-csv",
            post(prospects::handle_validate_csv),
        )
        .route(
            "/api/v1/prospects/generate-sample-data",
            post(prospects::handle_generate_sample_data),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
