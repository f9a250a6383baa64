use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CourierError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Unsupported database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Could not connect to database: {0}")]
    DatabaseConnect(SqlxError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream error with status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Language model returned an empty reply")]
    EmptyCompletion,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl From<figment::Error> for CourierError {
    fn from(e: figment::Error) -> Self {
        CourierError::Config(Box::new(e))
    }
}

impl IntoResponse for CourierError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            CourierError::DatabaseConnect(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "DATABASE_UNAVAILABLE",
                "Could not connect to the database. Please check your credentials.".to_string(),
            ),
            CourierError::Reqwest(_) | CourierError::EmptyCompletion => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "Language model service is unavailable.".to_string(),
            ),
            CourierError::UpstreamStatus { status, .. } => {
                let msg = match *status {
                    StatusCode::TOO_MANY_REQUESTS => "Upstream rate limit exceeded.",
                    StatusCode::UNAUTHORIZED => "Upstream authentication failed.",
                    StatusCode::FORBIDDEN => "Upstream permission denied.",
                    _ => "An upstream error occurred.",
                };
                (*status, "UPSTREAM_ERROR", msg.to_string())
            }
            CourierError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            CourierError::Config(_)
            | CourierError::UrlParse(_)
            | CourierError::InvalidDatabaseUrl(_)
            | CourierError::Database(_)
            | CourierError::Json(_)
            | CourierError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
