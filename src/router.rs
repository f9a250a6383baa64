use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::LanguageModel;
use crate::handlers::{api, page};
use crate::service::SqlAssistant;

/// Request bodies beyond this are rejected with 413.
pub const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct CourierState {
    pub assistant: SqlAssistant,
}

impl CourierState {
    pub fn new(model: Arc<dyn LanguageModel>, database_url: impl Into<Arc<str>>) -> Self {
        Self {
            assistant: SqlAssistant::new(model, database_url),
        }
    }
}

pub fn courier_router(state: CourierState) -> Router {
    Router::new()
        .route("/", get(page::index_page))
        .route("/ask", post(page::ask_page))
        .route("/api/schema", get(api::schema_handler))
        .route("/api/query", post(api::query_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
