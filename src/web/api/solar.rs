use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::location::GeoPosition;
use crate::solar::{self, ServoAngles, SolarPosition};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SolarQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SolarResponse {
    pub timestamp: DateTime<FixedOffset>,
    pub sun: SolarPosition,
    pub description: String,
    pub angles: ServoAngles,
}

#[utoipa::path(
    get,
    path = "/api/solar",
    params(
        ("latitude" = f64, Query, description = "Latitude in degrees"),
        ("longitude" = f64, Query, description = "Longitude in degrees")
    ),
    responses(
        (status = 200, description = "Current sun position and servo angles", body = SolarResponse),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse)
    ),
    tag = "solar"
)]
pub async fn position(
    State(state): State<AppState>,
    Query(query): Query<SolarQuery>,
) -> ApiResult<Json<SolarResponse>> {
    let position = GeoPosition::new(query.latitude, query.longitude)?;
    let settings = state.control.tracking_settings();
    let timestamp = settings.now();
    let sun = solar::compute(&position, &timestamp, settings.solar);

    Ok(Json(SolarResponse {
        timestamp,
        sun,
        description: sun.description(),
        angles: solar::to_servo_angles(&sun),
    }))
}
