use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather lookup is not configured (missing API key)")]
    NotConfigured,
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Weather API error: {0}")]
    Status(u16),
    #[error("could not parse weather data: {0}")]
    Parse(#[from] serde_json::Error),
}
