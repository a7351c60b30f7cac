//! Sample video listing.

use axum::extract::State;
use axum::Json;

use bowform_models::SampleVideoList;

use crate::error::ApiResult;
use crate::state::AppState;

/// List the bundled `*.mp4` sample videos.
pub async fn list_sample_videos(State(state): State<AppState>) -> ApiResult<Json<SampleVideoList>> {
    let videos = state.samples.list().await?;
    Ok(Json(SampleVideoList { videos }))
}
