//! Stored result lookup.

use axum::extract::{Path, State};
use axum::Json;

use bowform_models::{AnalysisId, AnalysisResult};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Fetch a previously stored analysis by identifier.
///
/// Identifiers that are not UUIDs can never have been issued, so they are
/// reported as not found.
pub async fn get_result(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<AnalysisResult>> {
    let id = AnalysisId::from_string(identifier);
    match state.results.load(&id).await {
        Ok(result) => Ok(Json(result)),
        Err(e) if e.is_client_error() => Err(ApiError::not_found("Result not found")),
        Err(e) => Err(e.into()),
    }
}
