use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::control::{SafetyAction, WeatherOutcome};
use crate::weather::WeatherCondition;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WeatherRequest {
    /// Defaults to the configured tracking location.
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ObservationRequest {
    pub condition: WeatherCondition,
}

#[utoipa::path(
    post,
    path = "/api/weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Weather report and the safety action taken", body = WeatherOutcome),
        (status = 400, description = "No location given or configured", body = ErrorResponse),
        (status = 502, description = "Weather service failed", body = ErrorResponse),
        (status = 503, description = "Weather lookups not configured", body = ErrorResponse)
    ),
    tag = "weather"
)]
pub async fn fetch(
    State(state): State<AppState>,
    request: Option<Json<WeatherRequest>>,
) -> ApiResult<Json<WeatherOutcome>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let outcome = state
        .control
        .fetch_weather(request.location.as_deref())
        .await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/weather/observation",
    request_body = ObservationRequest,
    responses(
        (status = 200, description = "Safety action taken", body = SafetyAction)
    ),
    tag = "weather"
)]
pub async fn observation(
    State(state): State<AppState>,
    Json(request): Json<ObservationRequest>,
) -> Json<SafetyAction> {
    Json(state.control.weather_observation(request.condition))
}
