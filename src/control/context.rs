use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use super::command::{parse_command, ControlCommand};
use super::error::ControlError;
use super::gate::ManualControlGate;
use super::safety::{SafetyAction, WeatherSafetyOverride};
use crate::location::GeoPosition;
use crate::notice::{Notice, Notices};
use crate::servo::{Axis, Rig, ServoError};
use crate::tracker::{Tracker, TrackerMode, TrackerStatus, TrackingSettings};
use crate::weather::{WeatherClient, WeatherCondition, WeatherError, WeatherReport};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherOutcome {
    pub report: WeatherReport,
    pub action: SafetyAction,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommandOutcome {
    pub command: ControlCommand,
    pub accepted: bool,
    pub message: String,
}

const IGNORED_WHILE_TRACKING: &str = "Ignored: auto tracking is active";

/// Everything the outer surfaces (API, CLI) may touch.
///
/// Manual changes and tracking transitions both run under the tracker lock,
/// so a manual command never slips in between the gate check and the rig
/// being claimed for auto tracking.
pub struct ControlContext {
    rig: Rig,
    settings: TrackingSettings,
    tracker: Mutex<Tracker>,
    gate: ManualControlGate,
    safety: WeatherSafetyOverride,
    weather: Option<WeatherClient>,
    notices: Notices,
    default_location: Option<String>,
}

impl ControlContext {
    pub fn new(
        rig: Rig,
        tracker: Tracker,
        weather: Option<WeatherClient>,
        notices: Notices,
        default_location: Option<String>,
    ) -> Self {
        Self {
            gate: ManualControlGate::new(rig.clone()),
            safety: WeatherSafetyOverride::new(rig.clone(), notices.clone()),
            rig,
            settings: *tracker.settings(),
            tracker: Mutex::new(tracker),
            weather,
            notices,
            default_location: default_location.filter(|l| !l.trim().is_empty()),
        }
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn tracking_settings(&self) -> TrackingSettings {
        self.settings
    }

    pub async fn tracking_status(&self) -> TrackerStatus {
        self.tracker.lock().await.status()
    }

    /// `location` falls back to the configured default location.
    ///
    /// The tracker lock is released while the location is geocoded; the
    /// rig is claimed only once it is taken again.
    pub async fn enable_tracking(&self, location: Option<&str>) -> Result<TrackerMode, ControlError> {
        let location = self.location_or_default(location);
        let lookup = self.tracker.lock().await.prepare_enable(location.as_deref())?;
        let (position, source) = lookup.resolve().await?;
        Ok(self.tracker.lock().await.activate(position, source)?)
    }

    pub async fn disable_tracking(&self) -> TrackerMode {
        self.tracker.lock().await.disable().await
    }

    pub async fn on_location_fix(&self, fix: GeoPosition) {
        self.tracker.lock().await.on_location_fix(fix);
    }

    pub async fn reset_location(&self) {
        self.tracker.lock().await.reset_location();
    }

    pub async fn manual_change(&self, axis: Axis, angle: i32) -> bool {
        let _tracker = self.tracker.lock().await;
        self.gate.attempt_manual_change(axis, angle)
    }

    pub async fn manual_adjust(&self, axis: Axis, delta: i32) -> bool {
        let _tracker = self.tracker.lock().await;
        self.gate.attempt_manual_adjust(axis, delta)
    }

    pub fn weather_observation(&self, condition: WeatherCondition) -> SafetyAction {
        self.safety.on_weather_observation(condition)
    }

    /// Looks up the weather and feeds the result to the safety override.
    pub async fn fetch_weather(&self, location: Option<&str>) -> Result<WeatherOutcome, ControlError> {
        let location = self
            .location_or_default(location)
            .ok_or(ControlError::NoWeatherLocation)?;
        let client = self.weather.as_ref().ok_or(WeatherError::NotConfigured)?;

        let report = match client.fetch(&location).await {
            Ok(report) => report,
            Err(e) => {
                self.notices.post(Notice::WeatherFetchFailed {
                    location,
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let action = self.safety.on_weather_observation(report.condition);
        Ok(WeatherOutcome { report, action })
    }

    pub fn update_endpoint(&self, endpoint: &str) -> String {
        let (endpoint, _changed) = self.rig.gateway().update_endpoint(endpoint);
        endpoint
    }

    pub async fn test_actuator(&self) -> Result<(), ServoError> {
        self.rig.gateway().test_connection().await
    }

    /// Parses and runs a free-text command.
    pub async fn execute_text(&self, text: &str) -> CommandOutcome {
        let command = parse_command(text);
        log::info!("Command '{}' parsed as {:?}", text.trim(), command);

        let (accepted, message) = match &command {
            ControlCommand::SetAngle { axis, angle } => {
                if self.manual_change(*axis, *angle).await {
                    (true, format!("{} set to {}", axis, self.rig.angle(*axis)))
                } else {
                    (false, IGNORED_WHILE_TRACKING.to_string())
                }
            }
            ControlCommand::Adjust { axis, delta } => {
                if self.manual_adjust(*axis, *delta).await {
                    (true, format!("{} moved to {}", axis, self.rig.angle(*axis)))
                } else {
                    (false, IGNORED_WHILE_TRACKING.to_string())
                }
            }
            ControlCommand::EnableTracking => match self.enable_tracking(None).await {
                Ok(_) => (true, "Auto tracking enabled".to_string()),
                Err(e) => (false, e.to_string()),
            },
            ControlCommand::DisableTracking => {
                self.disable_tracking().await;
                (true, "Auto tracking disabled".to_string())
            }
            ControlCommand::ResetLocation => {
                self.reset_location().await;
                (true, "Location reset".to_string())
            }
            ControlCommand::Weather { location } => {
                match self.fetch_weather(location.as_deref()).await {
                    Ok(outcome) => {
                        let report = &outcome.report;
                        let message = format!(
                            "{}: {}, {:.1}°C, wind {:.1} m/s {}",
                            report.location,
                            report.condition,
                            report.temperature_c,
                            report.wind_speed_ms,
                            report.wind_direction
                        );
                        (true, message)
                    }
                    Err(e) => (false, e.to_string()),
                }
            }
            ControlCommand::Unrecognized => (false, "Command not recognized".to_string()),
        };

        CommandOutcome {
            command,
            accepted,
            message,
        }
    }

    fn location_or_default(&self, location: Option<&str>) -> Option<String> {
        location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_location.clone())
    }
}
