//! `AuthUser` extractor: pulls the access token from the `token` query
//! parameter or the `Authorization` header and validates it.

use axum::extract::{FromRequestParts, Query};
use axum::http::Uri;
use axum::http::request::Parts;
use serde::Deserialize;

use chathub_core::error::AppError;
use chathub_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller of a WebSocket upgrade.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// Subject of the validated token.
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_query(&parts.uri)
            .or_else(|| token_from_header(parts))
            .ok_or_else(|| AppError::authentication("Missing access token"))?;

        let claims = state.jwt_decoder.decode_access_token(&token)?;

        Ok(AuthUser {
            user_id: claims.user_id(),
        })
    }
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
struct WsQuery {
    /// JWT access token.
    token: Option<String>,
}

/// Browsers cannot set headers on a WebSocket handshake, so the token
/// usually arrives as `?token=`.
fn token_from_query(uri: &Uri) -> Option<String> {
    let Query(query) = Query::<WsQuery>::try_from_uri(uri).ok()?;
    query.token.filter(|value| !value.is_empty())
}

fn token_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(raw: &'static str) -> Uri {
        Uri::from_static(raw)
    }

    #[test]
    fn test_token_from_query() {
        assert_eq!(
            token_from_query(&uri("/ws?a=1&token=abc.def")),
            Some("abc.def".to_string())
        );
        assert_eq!(token_from_query(&uri("/ws?token=")), None);
        assert_eq!(token_from_query(&uri("/ws?tokens=x")), None);
        assert_eq!(token_from_query(&uri("/ws")), None);
    }

    #[test]
    fn test_percent_encoded_token_is_decoded() {
        assert_eq!(
            token_from_query(&uri("/ws?token=abc%2Edef%2D_ghi")),
            Some("abc.def-_ghi".to_string())
        );
    }
}
