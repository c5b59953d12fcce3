use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::servo::{AxisState, Axis, RigSnapshot};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAngleRequest {
    /// Degrees; clamped to 0..=180.
    pub angle: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManualChangeResponse {
    /// False when auto tracking owns the rig.
    pub accepted: bool,
    pub axis: Axis,
    pub state: AxisState,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActuatorEndpoint {
    pub endpoint: String,
}

fn axis_state(state: &AppState, axis: Axis) -> AxisState {
    let snapshot = state.control.rig().snapshot();
    match axis {
        Axis::Base => snapshot.base,
        Axis::Panel => snapshot.panel,
    }
}

#[utoipa::path(
    get,
    path = "/api/servo",
    responses(
        (status = 200, description = "Current servo state", body = RigSnapshot)
    ),
    tag = "servo"
)]
pub async fn snapshot(State(state): State<AppState>) -> Json<RigSnapshot> {
    Json(state.control.rig().snapshot())
}

#[utoipa::path(
    post,
    path = "/api/servo/{axis}",
    params(
        ("axis" = Axis, Path, description = "base or panel")
    ),
    request_body = SetAngleRequest,
    responses(
        (status = 200, description = "Change accepted or ignored", body = ManualChangeResponse)
    ),
    tag = "servo"
)]
pub async fn set_angle(
    State(state): State<AppState>,
    Path(axis): Path<Axis>,
    Json(request): Json<SetAngleRequest>,
) -> Json<ManualChangeResponse> {
    let accepted = state.control.manual_change(axis, request.angle).await;
    Json(ManualChangeResponse {
        accepted,
        axis,
        state: axis_state(&state, axis),
    })
}

#[utoipa::path(
    post,
    path = "/api/servo/{axis}/adjust",
    params(
        ("axis" = Axis, Path, description = "base or panel")
    ),
    request_body = AdjustRequest,
    responses(
        (status = 200, description = "Change accepted or ignored", body = ManualChangeResponse)
    ),
    tag = "servo"
)]
pub async fn adjust(
    State(state): State<AppState>,
    Path(axis): Path<Axis>,
    Json(request): Json<AdjustRequest>,
) -> Json<ManualChangeResponse> {
    let accepted = state.control.manual_adjust(axis, request.delta).await;
    Json(ManualChangeResponse {
        accepted,
        axis,
        state: axis_state(&state, axis),
    })
}

#[utoipa::path(
    get,
    path = "/api/actuator",
    responses(
        (status = 200, description = "Actuator endpoint", body = ActuatorEndpoint)
    ),
    tag = "servo"
)]
pub async fn get_endpoint(State(state): State<AppState>) -> Json<ActuatorEndpoint> {
    Json(ActuatorEndpoint {
        endpoint: state.control.rig().gateway().endpoint(),
    })
}

#[utoipa::path(
    put,
    path = "/api/actuator",
    request_body = ActuatorEndpoint,
    responses(
        (status = 200, description = "Endpoint updated", body = ActuatorEndpoint),
        (status = 400, description = "Empty endpoint", body = ErrorResponse)
    ),
    tag = "servo"
)]
pub async fn put_endpoint(
    State(state): State<AppState>,
    Json(request): Json<ActuatorEndpoint>,
) -> ApiResult<Json<ActuatorEndpoint>> {
    if request.endpoint.trim().trim_end_matches('/').is_empty() {
        return Err(ApiError::Validation("endpoint must not be empty".into()));
    }
    let endpoint = state.control.update_endpoint(&request.endpoint);
    Ok(Json(ActuatorEndpoint { endpoint }))
}

#[utoipa::path(
    post,
    path = "/api/actuator/test",
    responses(
        (status = 204, description = "Actuator answered 200"),
        (status = 502, description = "Actuator unreachable or returned an error", body = ErrorResponse)
    ),
    tag = "servo"
)]
pub async fn test_endpoint(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.control.test_actuator().await?;
    Ok(StatusCode::NO_CONTENT)
}
