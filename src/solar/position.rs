use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use super::types::SolarPosition;
use crate::location::GeoPosition;

const MAX_DECLINATION_DEG: f64 = 23.45;
const SPRING_EQUINOX_DAY: f64 = 81.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarOptions {
    /// Mirror the azimuth (`360 - az`) for mounts whose base servo turns
    /// against the compass direction.
    pub invert_azimuth: bool,
}

impl Default for SolarOptions {
    fn default() -> Self {
        Self {
            invert_azimuth: true,
        }
    }
}

/// Sun azimuth and altitude for `position` at the local `timestamp`.
///
/// The UTC offset of `timestamp` defines the standard meridian used by the
/// equation-of-time correction.
pub fn compute(
    position: &GeoPosition,
    timestamp: &DateTime<FixedOffset>,
    options: SolarOptions,
) -> SolarPosition {
    let lat = position.lat_rad();
    let day_of_year = timestamp.ordinal() as f64;
    let hour = timestamp.hour() as f64 + timestamp.minute() as f64 / 60.0;
    let offset_hours = timestamp.offset().local_minus_utc() as f64 / 3600.0;

    let b = (360.0 / 365.0 * (day_of_year - SPRING_EQUINOX_DAY)).to_radians();
    let declination = (MAX_DECLINATION_DEG * b.sin()).to_radians();

    let equation_of_time = 9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin();
    let standard_meridian = offset_hours * 15.0;
    let time_correction = equation_of_time + 4.0 * (position.longitude_deg() - standard_meridian);
    let solar_time = hour + time_correction / 60.0;

    let hour_angle = (15.0 * (solar_time - 12.0)).to_radians();

    let azimuth = hour_angle
        .sin()
        .atan2(hour_angle.cos() * lat.sin() - declination.tan() * lat.cos())
        .to_degrees();
    let azimuth = normalize_degrees(azimuth);
    let azimuth = if options.invert_azimuth {
        normalize_degrees(360.0 - azimuth)
    } else {
        azimuth
    };

    let altitude = (lat.sin() * declination.sin()
        + lat.cos() * declination.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0)
    .asin()
    .to_degrees();

    SolarPosition {
        azimuth_deg: azimuth,
        altitude_deg: altitude,
    }
}

/// Wraps into [0, 360). `rem_euclid` alone can round tiny negatives up to 360.
fn normalize_degrees(value: f64) -> f64 {
    let wrapped = value.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(offset_hours: i32, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_summer_solstice_noon_new_york() {
        let pos = GeoPosition::new(40.0, -74.0).unwrap();
        let ts = local(-5, 2023, 6, 21, 12, 0);
        assert_eq!(ts.ordinal(), 172);

        let sun = compute(&pos, &ts, SolarOptions::default());
        assert!(sun.altitude_deg > 60.0);
        assert!((sun.altitude_deg - 73.441).abs() < 0.01);
        assert!((sun.azimuth_deg - 357.945).abs() < 0.01);
    }

    #[test]
    fn test_inversion_flag() {
        let pos = GeoPosition::new(40.0, -74.0).unwrap();
        let ts = local(-5, 2023, 6, 21, 12, 0);
        let inverted = compute(&pos, &ts, SolarOptions { invert_azimuth: true });
        let raw = compute(&pos, &ts, SolarOptions { invert_azimuth: false });
        assert!((raw.azimuth_deg - 2.055).abs() < 0.01);
        assert!((inverted.azimuth_deg + raw.azimuth_deg - 360.0).abs() < 1e-9);
        assert_eq!(inverted.altitude_deg, raw.altitude_deg);
    }

    #[test]
    fn test_midnight_is_night() {
        let pos = GeoPosition::new(40.0, -74.0).unwrap();
        let sun = compute(&pos, &local(-5, 2023, 6, 21, 0, 0), SolarOptions::default());
        assert!(!sun.is_daylight());
        assert!((sun.altitude_deg + 26.547).abs() < 0.01);
    }

    #[test]
    fn test_winter_morning_berlin() {
        let pos = GeoPosition::new(52.52, 13.405).unwrap();
        let ts = local(1, 2023, 12, 21, 9, 30);
        assert_eq!(ts.ordinal(), 355);
        let sun = compute(&pos, &ts, SolarOptions::default());
        assert!((sun.altitude_deg - 6.867).abs() < 0.01);
        assert!((sun.azimuth_deg - 35.336).abs() < 0.01);
    }

    #[test]
    fn test_output_ranges() {
        let offsets = [-12, -5, 0, 1, 5, 14];
        for lat in [-90.0, -66.5, -23.4, 0.0, 23.4, 45.0, 89.9, 90.0] {
            for lon in [-180.0, -74.0, 0.0, 13.4, 151.2, 180.0] {
                let pos = GeoPosition::new(lat, lon).unwrap();
                for (i, month) in (1..=12).enumerate() {
                    for hour in [0, 3, 6, 9, 12, 15, 18, 21, 23] {
                        let offset = offsets[i % offsets.len()];
                        let ts = local(offset, 2024, month, 15, hour, 59);
                        for invert_azimuth in [true, false] {
                            let sun = compute(&pos, &ts, SolarOptions { invert_azimuth });
                            assert!(
                                (0.0..360.0).contains(&sun.azimuth_deg),
                                "azimuth {} out of range",
                                sun.azimuth_deg
                            );
                            assert!(
                                (-90.0..=90.0).contains(&sun.altitude_deg),
                                "altitude {} out of range",
                                sun.altitude_deg
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-1e-17), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }

    #[test]
    fn test_deterministic() {
        let pos = GeoPosition::new(-33.87, 151.21).unwrap();
        let ts = local(10, 2024, 3, 1, 14, 7);
        let first = compute(&pos, &ts, SolarOptions::default());
        let second = compute(&pos, &ts, SolarOptions::default());
        assert_eq!(first, second);
    }
}
