use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::control::ControlError;
use crate::location::LocationError;
use crate::servo::ServoError;
use crate::tracker::TrackerError;
use crate::weather::WeatherError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Conflict(&'static str),
    Unprocessable(&'static str, String),
    Upstream(&'static str, String),
    Unavailable(&'static str, String),
}

impl From<LocationError> for ApiError {
    fn from(e: LocationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<ServoError> for ApiError {
    fn from(e: ServoError) -> Self {
        ApiError::Upstream("actuator_error", e.to_string())
    }
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::AlreadyRunning => ApiError::Conflict("tracker_already_running"),
            TrackerError::NoLocationAvailable => {
                ApiError::Unprocessable("no_location_available", e.to_string())
            }
            TrackerError::Geocode { .. } => ApiError::Unprocessable("geocode_failed", e.to_string()),
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::NotConfigured => {
                ApiError::Unavailable("weather_not_configured", e.to_string())
            }
            _ => ApiError::Upstream("weather_fetch_failed", e.to_string()),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::NoWeatherLocation => ApiError::Validation(e.to_string()),
            ControlError::Weather(e) => e.into(),
            ControlError::Tracker(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::Conflict(reason) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Unprocessable(reason, msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
            ApiError::Upstream(reason, msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
            ApiError::Unavailable(reason, msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
