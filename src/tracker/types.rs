use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, TimeZone, Utc};
use serde::Serialize;
use std::time::Duration;
use strum_macros::Display;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::location::{GeoPosition, LocationSource};
use crate::solar::{ServoAngles, SolarOptions, SolarPosition};

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSettings {
    pub update_interval: Duration,
    pub solar: SolarOptions,
    /// Pins the clock's UTC offset; the host's standard offset otherwise.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            solar: SolarOptions::default(),
            utc_offset: None,
        }
    }
}

impl TrackingSettings {
    /// Current time at the standard meridian's offset. Daylight saving time
    /// is never applied to the host offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        let now = Utc::now();
        let offset = self
            .utc_offset
            .unwrap_or_else(|| standard_offset(&Local, now.year()));
        now.with_timezone(&offset)
    }
}

/// The smaller of the January and July offsets of `tz`.
fn standard_offset<Tz: TimeZone>(tz: &Tz, year: i32) -> FixedOffset {
    [1, 7]
        .into_iter()
        .filter_map(|month| tz.with_ymd_and_hms(year, month, 1, 12, 0, 0).single())
        .map(|t| t.offset().fix())
        .min_by_key(|offset| offset.local_minus_utc())
        .unwrap_or_else(|| tz.offset_from_utc_datetime(&Utc::now().naive_utc()).fix())
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrackerMode {
    Idle,
    Tracking {
        session: Uuid,
        source: LocationSource,
        started_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateTrigger {
    Activation,
    Timer,
    LocationFix,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackingUpdate {
    pub timestamp: DateTime<FixedOffset>,
    pub trigger: UpdateTrigger,
    pub position: GeoPosition,
    pub sun: SolarPosition,
    pub angles: ServoAngles,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackerStatus {
    pub mode: TrackerMode,
    /// Location the running session is following.
    pub location: Option<GeoPosition>,
    /// Most recent fix from the positioning source, kept while idle too.
    pub live_fix: Option<GeoPosition>,
    pub update_interval_ms: u64,
    pub last_update: Option<TrackingUpdate>,
}
