use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use super::error::LocationError;

/// A point on the earth's surface, in degrees.
///
/// Only constructed through [`GeoPosition::new`], so latitude is always in
/// [-90, 90] and longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPosition {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl GeoPosition {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, LocationError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(LocationError::InvalidArgument(format!(
                "latitude {} outside [-90, 90]",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(LocationError::InvalidArgument(format!(
                "longitude {} outside [-180, 180]",
                longitude_deg
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Parses `"lat, lon"`.
    pub fn from_coordinates(coordinates: &str) -> Result<Self, LocationError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(LocationError::InvalidArgument(format!(
                "expected 'lat, lon', got '{}'",
                coordinates
            )));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| LocationError::InvalidArgument(format!("'{}': {}", s, e)))
        };
        Self::new(parse(parts[0])?, parse(parts[1])?)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }
}

/// Where the location driving a tracking session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    #[strum(serialize = "gps")]
    Gps,
    #[strum(serialize = "geocoded text")]
    GeocodedText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPosition::new(90.5, 0.0).is_err());
        assert!(GeoPosition::new(-91.0, 0.0).is_err());
        assert!(GeoPosition::new(0.0, 180.1).is_err());
        assert!(GeoPosition::new(f64::NAN, 0.0).is_err());
        assert!(GeoPosition::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_accepts_bounds() {
        assert!(GeoPosition::new(90.0, 180.0).is_ok());
        assert!(GeoPosition::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_from_coordinates() {
        let pos = GeoPosition::from_coordinates(" 52.52, 13.405 ").unwrap();
        assert_eq!(pos.latitude_deg(), 52.52);
        assert_eq!(pos.longitude_deg(), 13.405);

        assert!(GeoPosition::from_coordinates("52.52").is_err());
        assert!(GeoPosition::from_coordinates("north, east").is_err());
        assert!(GeoPosition::from_coordinates("95, 10").is_err());
    }
}
