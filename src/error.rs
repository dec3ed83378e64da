// Custom error types for the API layer. Core search/normalize/sample
// functions are total and never produce these; AppError exists for the
// HTTP boundary (validation failures and genuine internal faults).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    InternalServerError(anyhow::Error),
    // The user submitted a query with zero constraints; surfaced as a
    // validation message, not a server fault.
    NoCriteriaSupplied,
    NotFound(String),
}

// Implement conversion from anyhow::Error for easier error propagation
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::InternalServerError(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(e) => {
                // Log the detailed error here; don't expose internals to the client
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::NoCriteriaSupplied => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "検索条件を1つ以上指定してください。".to_string(),
            ),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

// Define a custom Result type using our AppError
pub type AppResult<T> = Result<T, AppError>;
