use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    Core(rd_core::Error),
    BadRequest(String),
    Unauthorized,
}

impl From<rd_core::Error> for ApiError {
    fn from(err: rd_core::Error) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use rd_core::Error;
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Core(Error::EmptyResult) => StatusCode::NOT_FOUND,
            ApiError::Core(Error::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(Error::Upstream { status: Some(code), .. }) if matches!(*code, 403 | 404 | 429) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Core(Error::Upstream { .. } | Error::Http(_) | Error::Serialization(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Core(Error::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Core(err) => err.to_string(),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized => "Missing or invalid API key".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {} {}", status, self.message());
        } else {
            tracing::debug!("{} {}", status, self.message());
        }
        (status, Json(ErrorBody { message: self.message() })).into_response()
    }
}
