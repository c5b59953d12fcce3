use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Weather condition, ordered from harmless to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
}

impl WeatherCondition {
    /// Maps an OpenWeatherMap `weather[].main` name. Unknown names count as
    /// clear.
    pub fn from_owm(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "thunderstorm" => WeatherCondition::Thunderstorm,
            "snow" => WeatherCondition::Snow,
            "rain" | "drizzle" => WeatherCondition::Rain,
            "clouds" => WeatherCondition::Clouds,
            _ => WeatherCondition::Clear,
        }
    }

    pub fn is_adverse(&self) -> bool {
        !matches!(self, WeatherCondition::Clear)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: f64,
    pub wind_direction: String,
    pub condition: WeatherCondition,
    pub rain_1h_mm: f64,
    pub snow_1h_mm: f64,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    wind: OwmWind,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

impl WeatherReport {
    /// Parses an OpenWeatherMap "current weather" body. The condition is the
    /// most severe of the listed ones.
    pub fn from_owm_json(location: &str, body: &str) -> Result<Self, serde_json::Error> {
        let raw: OwmResponse = serde_json::from_str(body)?;

        let condition = raw
            .weather
            .iter()
            .map(|w| WeatherCondition::from_owm(&w.main))
            .max()
            .unwrap_or(WeatherCondition::Clear);

        Ok(Self {
            location: location.to_string(),
            temperature_c: raw.main.temp,
            humidity_pct: raw.main.humidity,
            wind_speed_ms: raw.wind.speed,
            wind_direction_deg: raw.wind.deg,
            wind_direction: wind_direction_label(raw.wind.deg).to_string(),
            condition,
            rain_1h_mm: raw.rain.map(|r| r.one_hour).unwrap_or(0.0),
            snow_1h_mm: raw.snow.map(|s| s.one_hour).unwrap_or(0.0),
        })
    }
}

pub fn wind_direction_label(degrees: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let sector = (degrees.rem_euclid(360.0) / 45.0).round() as usize % DIRECTIONS.len();
    DIRECTIONS[sector]
}
