//! Event dispatch entry point for backend services.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use chathub_realtime::DispatchReport;

use crate::dto::request::DispatchRequest;
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /internal/dispatch
pub async fn dispatch(
    State(state): State<AppState>,
    Json(req): Json<DispatchRequest>,
) -> ApiResult<(StatusCode, Json<DispatchReport>)> {
    req.validate()?;

    let (envelope, scope) = req.into_parts();
    let report = state.hub.dispatch(envelope, scope).await;

    Ok((StatusCode::ACCEPTED, Json(report)))
}
