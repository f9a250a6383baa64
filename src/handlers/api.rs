use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::error::CourierError;
use crate::middleware::UserQuery;
use crate::router::CourierState;
use crate::types::QueryRecord;

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub schema: String,
}

/// GET /api/schema
pub async fn schema_handler(
    State(state): State<CourierState>,
) -> Result<Json<SchemaResponse>, CourierError> {
    let schema = state
        .assistant
        .schema()
        .await
        .inspect_err(|e| warn!(error = %e, "schema read failed"))?;
    Ok(Json(SchemaResponse { schema }))
}

/// POST /api/query -> the full record for one interaction.
pub async fn query_handler(
    State(state): State<CourierState>,
    UserQuery(query): UserQuery,
) -> Result<Json<QueryRecord>, CourierError> {
    let record = state
        .assistant
        .run(&query)
        .await
        .inspect_err(|e| warn!(error = %e, "query failed"))?;
    Ok(Json(record))
}
