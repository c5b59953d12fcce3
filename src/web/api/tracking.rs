use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::location::GeoPosition;
use crate::tracker::{TrackerMode, TrackerStatus};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnableRequest {
    /// Place name to geocode when no live fix is known.
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

#[utoipa::path(
    get,
    path = "/api/tracking/status",
    responses(
        (status = 200, description = "Tracking status", body = TrackerStatus)
    ),
    tag = "tracking"
)]
pub async fn status(State(state): State<AppState>) -> Json<TrackerStatus> {
    Json(state.control.tracking_status().await)
}

#[utoipa::path(
    post,
    path = "/api/tracking/enable",
    request_body = EnableRequest,
    responses(
        (status = 200, description = "Tracking started", body = TrackerMode),
        (status = 409, description = "Tracking already running", body = ErrorResponse),
        (status = 422, description = "No location available or geocoding failed", body = ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn enable(
    State(state): State<AppState>,
    request: Option<Json<EnableRequest>>,
) -> ApiResult<Json<TrackerMode>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let mode = state
        .control
        .enable_tracking(request.location.as_deref())
        .await?;
    Ok(Json(mode))
}

#[utoipa::path(
    post,
    path = "/api/tracking/disable",
    responses(
        (status = 200, description = "Tracking stopped", body = TrackerMode)
    ),
    tag = "tracking"
)]
pub async fn disable(State(state): State<AppState>) -> Json<TrackerMode> {
    Json(state.control.disable_tracking().await)
}

#[utoipa::path(
    post,
    path = "/api/location",
    request_body = LocationFix,
    responses(
        (status = 200, description = "Fix accepted", body = GeoPosition),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn post_fix(
    State(state): State<AppState>,
    Json(fix): Json<LocationFix>,
) -> ApiResult<Json<GeoPosition>> {
    let position = GeoPosition::new(fix.latitude, fix.longitude)?;
    state.control.on_location_fix(position).await;
    Ok(Json(position))
}

#[utoipa::path(
    delete,
    path = "/api/location",
    responses(
        (status = 204, description = "Live fix cleared")
    ),
    tag = "tracking"
)]
pub async fn reset_location(State(state): State<AppState>) -> StatusCode {
    state.control.reset_location().await;
    StatusCode::NO_CONTENT
}
