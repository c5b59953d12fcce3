use reqwest::Client;
use std::time::Duration;

use super::error::WeatherError;
use super::types::WeatherReport;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap "current weather" lookup.
pub struct WeatherClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WeatherError::NotConfigured);
        }
        let http_client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub async fn fetch(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let report = WeatherReport::from_owm_json(location, &body)?;
        log::info!(
            "Weather in {}: {} {:.1}°C, wind {:.1} m/s {}",
            location,
            report.condition,
            report.temperature_c,
            report.wind_speed_ms,
            report.wind_direction
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherCondition;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;

    async fn spawn_weather_server() -> String {
        let app = Router::new().route(
            "/weather",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("appid").map(String::as_str) != Some("secret")
                    || q.get("units").map(String::as_str) != Some("metric")
                {
                    return (StatusCode::UNAUTHORIZED, String::new());
                }
                let main = match q.get("q").map(String::as_str) {
                    Some("Stormville") => "Thunderstorm",
                    Some("Nowhere") => return (StatusCode::NOT_FOUND, String::new()),
                    _ => "Clear",
                };
                let body = serde_json::json!({
                    "weather": [{ "main": main }],
                    "main": { "temp": 21.0, "humidity": 40 },
                    "wind": { "speed": 3.0, "deg": 90 }
                });
                (StatusCode::OK, body.to_string())
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/weather", addr)
    }

    #[test]
    fn test_requires_api_key() {
        let err = WeatherClient::new(DEFAULT_WEATHER_URL, "  ", Duration::from_secs(5));
        assert!(matches!(err, Err(WeatherError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_fetch_report() {
        let url = spawn_weather_server().await;
        let client = WeatherClient::new(url, "secret", Duration::from_secs(5)).unwrap();
        let report = client.fetch("Stormville").await.unwrap();
        assert_eq!(report.condition, WeatherCondition::Thunderstorm);
        assert_eq!(report.wind_direction, "E");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let url = spawn_weather_server().await;
        let client = WeatherClient::new(url.clone(), "secret", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.fetch("Nowhere").await,
            Err(WeatherError::Status(404))
        ));

        let wrong_key = WeatherClient::new(url, "nope", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            wrong_key.fetch("Berlin").await,
            Err(WeatherError::Status(401))
        ));
    }
}
