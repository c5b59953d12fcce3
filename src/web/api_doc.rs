use utoipa::OpenApi;

use super::api::command::CommandRequest;
use super::api::error::ErrorResponse;
use super::api::servo::{ActuatorEndpoint, AdjustRequest, ManualChangeResponse, SetAngleRequest};
use super::api::solar::{SolarQuery, SolarResponse};
use super::api::tracking::{EnableRequest, LocationFix};
use super::api::weather::{ObservationRequest, WeatherRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tracking::status,
        super::api::tracking::enable,
        super::api::tracking::disable,
        super::api::tracking::post_fix,
        super::api::tracking::reset_location,
        super::api::servo::snapshot,
        super::api::servo::set_angle,
        super::api::servo::adjust,
        super::api::servo::get_endpoint,
        super::api::servo::put_endpoint,
        super::api::servo::test_endpoint,
        super::api::command::execute,
        super::api::weather::fetch,
        super::api::weather::observation,
        super::api::solar::position,
        super::api::notices::list,
        super::api::notices::stream,
    ),
    components(
        schemas(
            ErrorResponse,
            EnableRequest,
            LocationFix,
            SetAngleRequest,
            AdjustRequest,
            ManualChangeResponse,
            ActuatorEndpoint,
            CommandRequest,
            WeatherRequest,
            ObservationRequest,
            SolarQuery,
            SolarResponse,
            crate::tracker::TrackerMode,
            crate::tracker::TrackerStatus,
            crate::tracker::TrackingUpdate,
            crate::tracker::UpdateTrigger,
            crate::location::GeoPosition,
            crate::location::LocationSource,
            crate::servo::Axis,
            crate::servo::AxisState,
            crate::servo::AngleSource,
            crate::servo::RigSnapshot,
            crate::servo::ServoAngle,
            crate::solar::SolarPosition,
            crate::solar::ServoAngles,
            crate::control::ControlCommand,
            crate::control::CommandOutcome,
            crate::control::SafetyAction,
            crate::control::WeatherOutcome,
            crate::weather::WeatherCondition,
            crate::weather::WeatherReport,
            crate::notice::Notice,
            crate::notice::NoticeRecord,
        )
    ),
    info(
        title = "Sun-O-Mat Control API",
        description = "Solar tracker control: auto tracking, manual servo moves, weather safety",
        version = "0.1.0"
    ),
    tags(
        (name = "tracking", description = "Auto tracking and location"),
        (name = "servo", description = "Manual servo control and actuator endpoint"),
        (name = "command", description = "Free-text commands"),
        (name = "weather", description = "Weather lookups and the thunderstorm override"),
        (name = "solar", description = "Sun position"),
        (name = "notices", description = "User-visible notices")
    )
)]
pub struct ApiDoc;
