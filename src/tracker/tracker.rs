use chrono::Utc;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use super::error::TrackerError;
use super::types::{TrackerMode, TrackerStatus, TrackingSettings, TrackingUpdate, UpdateTrigger};
use crate::location::{GeoPosition, Geocoder, LocationSource};
use crate::notice::{Notice, Notices};
use crate::servo::{Axis, CommandOrigin, Rig};
use crate::solar;

#[derive(Debug)]
struct Shared {
    status: TrackerStatus,
}

#[derive(Debug)]
struct WorkerHandle {
    session: Uuid,
    stop_tx: oneshot::Sender<()>,
    fix_tx: mpsc::UnboundedSender<GeoPosition>,
    join: JoinHandle<()>,
}

/// Keeps the panel pointed at the sun while enabled.
///
/// An enabled tracker holds the rig's auto lock, recomputes on a fixed
/// cadence and immediately on every fresh location fix.
pub struct Tracker {
    rig: Rig,
    geocoder: Arc<dyn Geocoder>,
    notices: Notices,
    settings: TrackingSettings,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

impl Tracker {
    pub fn new(
        rig: Rig,
        geocoder: Arc<dyn Geocoder>,
        notices: Notices,
        settings: TrackingSettings,
    ) -> Self {
        Self {
            rig,
            geocoder,
            notices,
            settings,
            shared: Arc::new(StdMutex::new(Shared {
                status: TrackerStatus {
                    mode: TrackerMode::Idle,
                    location: None,
                    live_fix: None,
                    update_interval_ms: settings.update_interval.as_millis() as u64,
                    last_update: None,
                },
            })),
            worker: None,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.shared.lock().unwrap().status.clone()
    }

    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    /// Checks that tracking can start and picks the location source. A live
    /// fix wins over `location_text`, which is only used when no fix is
    /// known. Text of the form "lat, lon" is taken as coordinates; anything
    /// else needs a geocoder lookup, which the caller runs via
    /// [`LocationLookup::resolve`] before calling [`Tracker::activate`].
    pub fn prepare_enable(&self, location_text: Option<&str>) -> Result<LocationLookup, TrackerError> {
        if self.worker.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let live_fix = self.shared.lock().unwrap().status.live_fix;
        if let Some(fix) = live_fix {
            return Ok(LocationLookup::Ready(fix, LocationSource::Gps));
        }

        let Some(query) = location_text.map(str::trim).filter(|t| !t.is_empty()) else {
            self.notices.post(Notice::NoLocationAvailable);
            return Err(TrackerError::NoLocationAvailable);
        };

        if let Ok(position) = GeoPosition::from_coordinates(query) {
            return Ok(LocationLookup::Ready(position, LocationSource::GeocodedText));
        }

        Ok(LocationLookup::Geocode {
            geocoder: self.geocoder.clone(),
            notices: self.notices.clone(),
            query: query.to_string(),
        })
    }

    /// Claims the rig and starts the session. A live fix that arrived while
    /// the location was being looked up still wins.
    pub fn activate(
        &mut self,
        position: GeoPosition,
        source: LocationSource,
    ) -> Result<TrackerMode, TrackerError> {
        if self.worker.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let live_fix = self.shared.lock().unwrap().status.live_fix;
        let (position, source) = match live_fix {
            Some(fix) => (fix, LocationSource::Gps),
            None => (position, source),
        };

        let session = Uuid::new_v4();
        self.rig.claim_for_auto(session);

        let mode = TrackerMode::Tracking {
            session,
            source,
            started_at: Utc::now(),
        };
        {
            let mut locked = self.shared.lock().unwrap();
            locked.status.mode = mode.clone();
            locked.status.location = Some(position);
            locked.status.last_update = None;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let (fix_tx, fix_rx) = mpsc::unbounded_channel();
        let session_loop = TrackingLoop {
            rig: self.rig.clone(),
            shared: self.shared.clone(),
            settings: self.settings,
            session,
        };
        let join = tokio::spawn(session_loop.run(position, stop_rx, fix_rx));

        self.worker = Some(WorkerHandle {
            session,
            stop_tx,
            fix_tx,
            join,
        });

        self.notices.post(Notice::TrackingStarted {
            source,
            latitude_deg: position.latitude_deg(),
            longitude_deg: position.longitude_deg(),
        });

        Ok(mode)
    }

    /// Stops tracking and hands the rig back to manual control. No-op while
    /// idle.
    pub async fn disable(&mut self) -> TrackerMode {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            self.rig.release_auto(worker.session);

            {
                let mut locked = self.shared.lock().unwrap();
                locked.status.mode = TrackerMode::Idle;
                locked.status.location = None;
            }
            self.notices.post(Notice::TrackingStopped);
        }
        self.status().mode
    }

    /// Records a fresh fix; a running session recomputes right away.
    pub fn on_location_fix(&mut self, fix: GeoPosition) {
        self.shared.lock().unwrap().status.live_fix = Some(fix);
        if let Some(worker) = &self.worker {
            if worker.fix_tx.send(fix).is_err() {
                log::warn!("Tracking worker gone, dropping location fix");
            }
        }
    }

    /// Forgets the live fix. A running session keeps its current location.
    pub fn reset_location(&mut self) {
        self.shared.lock().unwrap().status.live_fix = None;
    }
}

/// The location an activation will use, possibly still to be geocoded.
pub enum LocationLookup {
    Ready(GeoPosition, LocationSource),
    Geocode {
        geocoder: Arc<dyn Geocoder>,
        notices: Notices,
        query: String,
    },
}

impl LocationLookup {
    pub async fn resolve(self) -> Result<(GeoPosition, LocationSource), TrackerError> {
        let (geocoder, notices, query) = match self {
            LocationLookup::Ready(position, source) => return Ok((position, source)),
            LocationLookup::Geocode {
                geocoder,
                notices,
                query,
            } => (geocoder, notices, query),
        };

        match geocoder.geocode(&query).await {
            Ok(position) => Ok((position, LocationSource::GeocodedText)),
            Err(source) => {
                notices.post(Notice::GeocodeFailed {
                    query: query.clone(),
                    reason: source.to_string(),
                });
                Err(TrackerError::Geocode { query, source })
            }
        }
    }
}

struct TrackingLoop {
    rig: Rig,
    shared: Arc<StdMutex<Shared>>,
    settings: TrackingSettings,
    session: Uuid,
}

impl TrackingLoop {
    async fn run(
        self,
        mut position: GeoPosition,
        mut stop_rx: oneshot::Receiver<()>,
        mut fix_rx: mpsc::UnboundedReceiver<GeoPosition>,
    ) {
        self.update(position, UpdateTrigger::Activation);

        let period = self.settings.update_interval;
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = timer.tick() => self.update(position, UpdateTrigger::Timer),
                fix = fix_rx.recv() => match fix {
                    Some(fix) => {
                        position = fix;
                        self.update(position, UpdateTrigger::LocationFix);
                        timer.reset();
                    }
                    None => break,
                },
            }
        }

        log::debug!("Tracking session {} finished", self.session);
    }

    fn update(&self, position: GeoPosition, trigger: UpdateTrigger) {
        let timestamp = self.settings.now();
        let sun = solar::compute(&position, &timestamp, self.settings.solar);
        let angles = solar::to_servo_angles(&sun);

        let origin = CommandOrigin::Auto(self.session);
        self.rig.command(Axis::Base, angles.base.get(), origin);
        self.rig.command(Axis::Panel, angles.panel.get(), origin);

        log::info!(
            "Panel position updated ({}) - Base: {}, Panel: {} (Solar: {:.1}° azimuth, {:.1}° altitude)",
            trigger,
            angles.base,
            angles.panel,
            sun.azimuth_deg,
            sun.altitude_deg
        );
        if !sun.is_daylight() {
            log::info!("Sun is below horizon, panel parked flat");
        }

        let mut locked = self.shared.lock().unwrap();
        locked.status.location = Some(position);
        locked.status.last_update = Some(TrackingUpdate {
            timestamp,
            trigger,
            position,
            sun,
            angles,
        });
    }
}
