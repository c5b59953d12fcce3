use thiserror::Error;

use crate::location::GeocodeError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker already running")]
    AlreadyRunning,
    #[error("no location available: enable GPS or enter a location")]
    NoLocationAvailable,
    #[error("could not resolve location '{query}': {source}")]
    Geocode {
        query: String,
        source: GeocodeError,
    },
}
