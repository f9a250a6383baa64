use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::CourierError;

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub query: String,
}

/// JSON `{ "query": ... }` body, trimmed and required to be non-empty.
#[derive(Debug, Clone)]
pub struct UserQuery(pub String);

impl<S> FromRequest<S> for UserQuery
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = match Json::<QueryBody>::from_request(req, state).await {
            Ok(v) => v,
            Err(rejection) => return Err(rejection.into_response()),
        };

        let query = body.query.trim();
        if query.is_empty() {
            return Err(
                CourierError::BadRequest("`query` must not be empty".to_string()).into_response(),
            );
        }
        Ok(UserQuery(query.to_string()))
    }
}
