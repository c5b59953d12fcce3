use serde::Serialize;
use utoipa::ToSchema;

/// Sun position as seen from the rig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SolarPosition {
    /// Degrees in [0, 360).
    pub azimuth_deg: f64,
    /// Degrees in [-90, 90]; zero or below means night.
    pub altitude_deg: f64,
}

const SECTORS: [(f64, &str); 8] = [
    (22.5, "North"),
    (67.5, "Northeast"),
    (112.5, "East"),
    (157.5, "Southeast"),
    (202.5, "South"),
    (247.5, "Southwest"),
    (292.5, "West"),
    (337.5, "Northwest"),
];

impl SolarPosition {
    pub fn is_daylight(&self) -> bool {
        self.altitude_deg > 0.0
    }

    pub fn compass_direction(&self) -> &'static str {
        SECTORS
            .iter()
            .find(|(upper, _)| self.azimuth_deg < *upper)
            .map(|(_, name)| *name)
            .unwrap_or("North")
    }

    pub fn description(&self) -> String {
        if self.altitude_deg < 0.0 {
            return "Sun is below horizon (nighttime)".to_string();
        }
        format!(
            "Sun is {:.1}° above horizon in the {}",
            self.altitude_deg,
            self.compass_direction()
        )
    }
}
