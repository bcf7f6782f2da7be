use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::raffle::RaffleError;

const LOG_TARGET: &str = "server::error";

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Conflict(String),
    Forbidden(String),
    Unauthorized,
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<RaffleError> for ApiError {
    fn from(err: RaffleError) -> Self {
        match err {
            RaffleError::NotFound(_) => ApiError::NotFound,
            RaffleError::Validation(message) => ApiError::BadRequest(message),
            RaffleError::AlreadyInitialized(event_id) => {
                ApiError::Conflict(format!("event {event_id} already has a pool"))
            }
            RaffleError::SlotSold(number) => {
                ApiError::Conflict(format!("number {number} is already sold"))
            }
            RaffleError::SlotUnavailable(number) => {
                ApiError::Conflict(format!("number {number} is not reserved by the payer"))
            }
            RaffleError::Forbidden(required) => {
                ApiError::Forbidden(format!("requires role {required}"))
            }
            RaffleError::Database(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message).into_response(),
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::Internal(message) => {
                error!(target = LOG_TARGET, %message, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}
