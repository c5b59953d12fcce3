use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder responded with status {0}")]
    Status(u16),
    #[error("could not find location '{0}'")]
    NotFound(String),
    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}
