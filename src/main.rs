mod control;
mod location;
mod notice;
mod servo;
mod solar;
mod tracker;
mod weather;
mod web;

#[cfg(test)]
mod testing;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

use crate::control::ControlContext;
use crate::location::{GeoPosition, GeocodeError, LocationError, NominatimGeocoder};
use crate::notice::Notices;
use crate::servo::{Axis, Rig, ServoError, ServoGateway};
use crate::solar::SolarOptions;
use crate::tracker::{Tracker, TrackingSettings};
use crate::weather::{WeatherClient, WeatherError};
use crate::web::config::{Config, ConfigError};

#[derive(Parser)]
#[command(name = "sun-o-mat")]
#[command(about = "Solar panel tracker control")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the control API
    Serve {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the sun position and servo angles for a place
    Position {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// RFC 3339 timestamp, e.g. 2023-06-21T12:00:00-05:00 (default: now)
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<FixedOffset>>,
        /// Report the raw compass azimuth
        #[arg(long)]
        no_invert: bool,
    },
    /// Send a single angle to the actuator
    Servo {
        #[arg(long)]
        axis: Axis,
        #[arg(long, allow_negative_numbers = true)]
        angle: i32,
        /// Overrides the configured endpoint
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Look up the current weather
    Weather {
        location: String,
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("actuator client error: {0}")]
    Servo(#[from] ServoError),
    #[error("geocoder error: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("weather client error: {0}")]
    Weather(#[from] WeatherError),
    #[error("invalid location: {0}")]
    Location(#[from] LocationError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Position {
            lat,
            lon,
            at,
            no_invert,
        } => position(lat, lon, at, no_invert),
        Commands::Servo {
            axis,
            angle,
            endpoint,
            config,
        } => servo(axis, angle, endpoint.as_deref(), config.as_deref()).await,
        Commands::Weather { location, config } => weather(&location, config.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("expected RFC 3339 time: {}", e))
}

fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

fn weather_client(config: &Config) -> Result<Option<WeatherClient>, StartupError> {
    let Some(api_key) = config.weather.api_key.as_deref() else {
        return Ok(None);
    };
    match WeatherClient::new(
        config.weather.base_url.clone(),
        api_key,
        config.weather_timeout()?,
    ) {
        Ok(client) => Ok(Some(client)),
        Err(WeatherError::NotConfigured) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn build_control(config: &Config) -> Result<ControlContext, StartupError> {
    let notices = Notices::new();
    let gateway = ServoGateway::new(&config.actuator.endpoint, config.gateway_timeouts()?)?;
    let rig = Rig::new(gateway, notices.clone());

    let geocoder = NominatimGeocoder::new(
        config.geocoder.base_url.clone(),
        config.geocoder_timeout()?,
    )?;
    let settings: TrackingSettings = config.tracking_settings()?;
    let tracker = Tracker::new(rig.clone(), Arc::new(geocoder), notices.clone(), settings);

    let weather = weather_client(config)?;
    if weather.is_none() {
        log::warn!("No weather API key configured, weather lookups disabled");
    }

    Ok(ControlContext::new(
        rig,
        tracker,
        weather,
        notices,
        config.tracking.location.clone(),
    ))
}

async fn serve(config_path: Option<&str>) -> Result<(), StartupError> {
    let config = load_config(config_path)?;
    let control = Arc::new(build_control(&config)?);
    log::info!(
        "Actuator at {}, tracking every {}",
        control.rig().gateway().endpoint(),
        humantime::format_duration(control.tracking_settings().update_interval)
    );
    web::run_server(&config.web.bind, control).await?;
    Ok(())
}

fn position(
    lat: f64,
    lon: f64,
    at: Option<DateTime<FixedOffset>>,
    no_invert: bool,
) -> Result<(), StartupError> {
    let position = GeoPosition::new(lat, lon)?;
    let timestamp = at.unwrap_or_else(|| TrackingSettings::default().now());
    let options = SolarOptions {
        invert_azimuth: !no_invert,
    };

    let sun = solar::compute(&position, &timestamp, options);
    let angles = solar::to_servo_angles(&sun);

    println!("{}", timestamp.to_rfc3339());
    println!("{}", sun.description());
    println!(
        "  azimuth {:.2}°  altitude {:.2}°",
        sun.azimuth_deg, sun.altitude_deg
    );
    println!("  base {}  panel {}", angles.base, angles.panel);
    Ok(())
}

async fn servo(
    axis: Axis,
    angle: i32,
    endpoint: Option<&str>,
    config_path: Option<&str>,
) -> Result<(), StartupError> {
    let config = load_config(config_path)?;
    let endpoint = endpoint.unwrap_or(&config.actuator.endpoint);
    let gateway = ServoGateway::new(endpoint, config.gateway_timeouts()?)?;

    let pending = gateway.set_angle(axis, angle);
    println!("{} -> {}", pending.url(), pending.angle());
    pending.outcome().await?;
    println!("OK");
    Ok(())
}

async fn weather(location: &str, config_path: Option<&str>) -> Result<(), StartupError> {
    let config = load_config(config_path)?;
    let client = weather_client(&config)?.ok_or(WeatherError::NotConfigured)?;
    let report = client.fetch(location).await?;

    println!("Location:   {}", report.location);
    println!("Condition:  {}", report.condition);
    println!("Temp:       {:.1}°C", report.temperature_c);
    println!("Humidity:   {:.0}%", report.humidity_pct);
    println!(
        "Wind:       {:.1} m/s {:.0}° ({})",
        report.wind_speed_ms, report.wind_direction_deg, report.wind_direction
    );
    println!("Rain (1h):  {:.1} mm", report.rain_1h_mm);
    println!("Snow (1h):  {:.1} mm", report.snow_1h_mm);
    if report.condition.is_adverse() {
        println!("Advisory:   {} detected", report.condition);
    }
    Ok(())
}
