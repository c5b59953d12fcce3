use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ValueEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    /// Rotation around the vertical axis.
    Base,
    /// Tilt of the panel itself.
    Panel,
}

impl Axis {
    pub fn path(&self) -> &'static str {
        match self {
            Axis::Base => "/baseServo",
            Axis::Panel => "/panelServo",
        }
    }
}

/// Servo position in whole degrees, always within [0, 180].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(from = "i32", into = "i32")]
pub struct ServoAngle(i32);

impl ServoAngle {
    pub const MIN: ServoAngle = ServoAngle(0);
    pub const CENTER: ServoAngle = ServoAngle(90);
    pub const MAX: ServoAngle = ServoAngle(180);

    pub fn clamped(degrees: i32) -> Self {
        Self(degrees.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Rounds to the nearest degree before clamping. NaN maps to 0.
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees.is_nan() {
            return Self::MIN;
        }
        let rounded = degrees.round().clamp(Self::MIN.0 as f64, Self::MAX.0 as f64);
        Self(rounded as i32)
    }

    pub fn offset(self, delta: i32) -> Self {
        Self::clamped(self.0.saturating_add(delta))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ServoAngle {
    fn from(value: i32) -> Self {
        Self::clamped(value)
    }
}

impl From<ServoAngle> for i32 {
    fn from(value: ServoAngle) -> Self {
        value.0
    }
}

impl Default for ServoAngle {
    fn default() -> Self {
        Self::CENTER
    }
}

impl fmt::Display for ServoAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Who last commanded an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AngleSource {
    Manual,
    Auto,
    SafetyOverride,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(ServoAngle::clamped(999).get(), 180);
        assert_eq!(ServoAngle::clamped(-15).get(), 0);
        assert_eq!(ServoAngle::clamped(42).get(), 42);
        assert_eq!(ServoAngle::clamped(i32::MIN).get(), 0);
    }

    #[test]
    fn test_from_degrees_rounds() {
        assert_eq!(ServoAngle::from_degrees(178.97).get(), 179);
        assert_eq!(ServoAngle::from_degrees(179.95).get(), 180);
        assert_eq!(ServoAngle::from_degrees(-0.4).get(), 0);
        assert_eq!(ServoAngle::from_degrees(1e12).get(), 180);
        assert_eq!(ServoAngle::from_degrees(f64::NAN).get(), 0);
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(ServoAngle::CENTER.offset(15).get(), 105);
        assert_eq!(ServoAngle::MAX.offset(40).get(), 180);
        assert_eq!(ServoAngle::MIN.offset(-15).get(), 0);
        assert_eq!(ServoAngle::MIN.offset(i32::MIN).get(), 0);
    }

    #[test]
    fn test_deserialize_clamps() {
        let angle: ServoAngle = serde_json::from_str("250").unwrap();
        assert_eq!(angle, ServoAngle::MAX);
        assert_eq!(serde_json::to_string(&ServoAngle::CENTER).unwrap(), "90");
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(Axis::Base.to_string(), "base");
        assert_eq!(Axis::Panel.path(), "/panelServo");
        let axis: Axis = serde_json::from_str("\"panel\"").unwrap();
        assert_eq!(axis, Axis::Panel);
        assert_eq!(AngleSource::SafetyOverride.to_string(), "safety_override");
    }
}
