use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use crate::error::ApiError;
use crate::AppState;

/// Rejects requests without the configured API key header. No-op when no key is configured.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(key) = &state.api_key {
        let provided = request
            .headers()
            .get(&key.header)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !constant_time_eq(provided, key.value.as_bytes()) {
            tracing::warn!("🔒 Rejected {} {}: missing or invalid API key", request.method(), request.uri().path());
            return ApiError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}

/// Compares every byte regardless of where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
