mod error;
mod tracker;
mod types;

pub use error::TrackerError;
pub use tracker::Tracker;
pub use types::{TrackerMode, TrackerStatus, TrackingSettings, TrackingUpdate, UpdateTrigger};
