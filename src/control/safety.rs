use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::notice::{Notice, Notices};
use crate::servo::{Axis, CommandOrigin, Rig, ServoAngle};
use crate::weather::WeatherCondition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SafetyAction {
    None,
    Advisory { condition: WeatherCondition },
    PanelStowed { condition: WeatherCondition, command: Uuid },
}

/// Reacts to weather observations. A thunderstorm lays the panel flat even
/// while auto-tracking owns the rig.
#[derive(Clone)]
pub struct WeatherSafetyOverride {
    rig: Rig,
    notices: Notices,
}

impl WeatherSafetyOverride {
    pub fn new(rig: Rig, notices: Notices) -> Self {
        Self { rig, notices }
    }

    pub fn on_weather_observation(&self, condition: WeatherCondition) -> SafetyAction {
        match condition {
            WeatherCondition::Thunderstorm => {
                let command = self.rig.command(
                    Axis::Panel,
                    ServoAngle::MIN.get(),
                    CommandOrigin::SafetyOverride,
                );
                self.notices.post(Notice::SafetyOverride { condition });
                SafetyAction::PanelStowed { condition, command }
            }
            WeatherCondition::Clear => SafetyAction::None,
            _ => {
                self.notices.post(Notice::WeatherAdvisory { condition });
                SafetyAction::Advisory { condition }
            }
        }
    }
}
