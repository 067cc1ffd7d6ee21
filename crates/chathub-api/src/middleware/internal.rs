//! Shared-key guard for `/internal` routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use chathub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the internal API key.
pub const INTERNAL_KEY_HEADER: &str = "x-internal-key";

/// Rejects requests whose `x-internal-key` does not match the configured
/// key. Passes everything through when no key is configured.
pub async fn require_internal_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.config.auth.internal_api_key.as_deref() {
        let provided = request
            .headers()
            .get(INTERNAL_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        let authorized =
            provided.is_some_and(|key| constant_time_eq(key.as_bytes(), expected.as_bytes()));
        if !authorized {
            tracing::warn!(path = %request.uri().path(), "Rejected internal request with missing or wrong key");
            return Err(AppError::authentication("Invalid internal API key").into());
        }
    }

    Ok(next.run(request).await)
}

/// Byte comparison whose running time does not depend on where the inputs
/// first differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"internal-key", b"internal-key"));
        assert!(!constant_time_eq(b"internal-key", b"internal-kez"));
        assert!(!constant_time_eq(b"internal-key", b"internal-key-2"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
