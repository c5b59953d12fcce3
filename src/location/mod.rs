mod error;
mod geocode;
mod types;

pub use error::{GeocodeError, LocationError};
pub use geocode::{Geocoder, NominatimGeocoder, DEFAULT_NOMINATIM_URL};
pub use types::{GeoPosition, LocationSource};
