use serde::Serialize;
use utoipa::ToSchema;

use super::types::SolarPosition;
use crate::servo::ServoAngle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServoAngles {
    pub base: ServoAngle,
    pub panel: ServoAngle,
}

/// Maps a sun position onto the rig's two 180° servos.
///
/// The base covers the full compass at half resolution; the panel spreads
/// the 0-90° altitude range over its whole travel. At night the panel lies
/// flat.
pub fn to_servo_angles(sun: &SolarPosition) -> ServoAngles {
    let base = ServoAngle::from_degrees(sun.azimuth_deg / 2.0);
    let panel = if sun.is_daylight() {
        ServoAngle::from_degrees(sun.altitude_deg * 2.0)
    } else {
        ServoAngle::MIN
    };
    ServoAngles { base, panel }
}
