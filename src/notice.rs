//! User-visible notices.
//!
//! Every condition the operator must hear about (actuator failures, missing
//! location, weather advisories, the safety override) is posted here. A
//! notice is logged, kept in a short history for the API and broadcast to
//! live subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::location::LocationSource;
use crate::servo::{Axis, ServoAngle};
use crate::weather::WeatherCondition;

const HISTORY_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    TrackingStarted {
        source: LocationSource,
        latitude_deg: f64,
        longitude_deg: f64,
    },
    TrackingStopped,
    NoLocationAvailable,
    GeocodeFailed {
        query: String,
        reason: String,
    },
    ActuatorError {
        axis: Axis,
        angle: ServoAngle,
        message: String,
    },
    WeatherAdvisory {
        condition: WeatherCondition,
    },
    SafetyOverride {
        condition: WeatherCondition,
    },
    WeatherFetchFailed {
        location: String,
        reason: String,
    },
}

impl Notice {
    fn level(&self) -> log::Level {
        match self {
            Notice::TrackingStarted { .. } | Notice::TrackingStopped => log::Level::Info,
            Notice::NoLocationAvailable | Notice::WeatherAdvisory { .. } => log::Level::Warn,
            Notice::GeocodeFailed { .. }
            | Notice::ActuatorError { .. }
            | Notice::SafetyOverride { .. }
            | Notice::WeatherFetchFailed { .. } => log::Level::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TrackingStarted {
                source,
                latitude_deg,
                longitude_deg,
            } => write!(
                f,
                "Auto tracking started ({} at {:.4}, {:.4})",
                source, latitude_deg, longitude_deg
            ),
            Notice::TrackingStopped => write!(f, "Auto tracking stopped"),
            Notice::NoLocationAvailable => write!(f, "Please enable GPS or enter location"),
            Notice::GeocodeFailed { query, reason } => {
                write!(f, "Could not find location '{}': {}", query, reason)
            }
            Notice::ActuatorError {
                axis,
                angle,
                message,
            } => write!(f, "{} servo to {} failed: {}", axis, angle, message),
            Notice::WeatherAdvisory { condition } => write!(f, "{} detected!", condition),
            Notice::SafetyOverride { condition } => write!(
                f,
                "DANGER: {} detected, setting panel to flat position",
                condition
            ),
            Notice::WeatherFetchFailed { location, reason } => {
                write!(f, "Weather fetch error for '{}': {}", location, reason)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NoticeRecord {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub notice: Notice,
}

#[derive(Clone)]
pub struct Notices {
    tx: broadcast::Sender<NoticeRecord>,
    recent: Arc<StdMutex<VecDeque<NoticeRecord>>>,
}

impl Notices {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HISTORY_LEN);
        Self {
            tx,
            recent: Arc::new(StdMutex::new(VecDeque::with_capacity(HISTORY_LEN))),
        }
    }

    pub fn post(&self, notice: Notice) {
        let record = NoticeRecord {
            timestamp: Utc::now(),
            message: notice.to_string(),
            notice,
        };
        log::log!(record.notice.level(), "{}", record.message);

        {
            let mut recent = self.recent.lock().unwrap();
            if recent.len() == HISTORY_LEN {
                recent.pop_front();
            }
            recent.push_back(record.clone());
        }

        // No subscribers is fine; the history still has it.
        let _ = self.tx.send(record);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NoticeRecord> {
        self.tx.subscribe()
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<NoticeRecord> {
        self.recent.lock().unwrap().iter().cloned().collect()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let notices = Notices::new();
        for _ in 0..HISTORY_LEN + 5 {
            notices.post(Notice::TrackingStopped);
        }
        notices.post(Notice::NoLocationAvailable);
        let recent = notices.recent();
        assert_eq!(recent.len(), HISTORY_LEN);
        assert_eq!(recent.last().unwrap().notice, Notice::NoLocationAvailable);
    }

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        notices.post(Notice::SafetyOverride {
            condition: WeatherCondition::Thunderstorm,
        });
        let record = rx.recv().await.unwrap();
        assert_eq!(
            record.message,
            "DANGER: Thunderstorm detected, setting panel to flat position"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Notice::ActuatorError {
            axis: Axis::Panel,
            angle: ServoAngle::clamped(30),
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "actuator_error");
        assert_eq!(json["axis"], "panel");
        assert_eq!(json["angle"], 30);
    }
}
