use thiserror::Error;

use crate::tracker::TrackerError;
use crate::weather::WeatherError;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no location given for the weather lookup")]
    NoWeatherLocation,
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}
