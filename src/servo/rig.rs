use serde::Serialize;
use std::sync::{Arc, Mutex as StdMutex};
use utoipa::ToSchema;
use uuid::Uuid;

use super::gateway::ServoGateway;
use super::types::{AngleSource, Axis, ServoAngle};
use crate::notice::{Notice, Notices};

/// Why a command is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    Manual,
    /// Issued by the tracking session with this id.
    Auto(Uuid),
    SafetyOverride,
}

impl CommandOrigin {
    fn source(&self) -> AngleSource {
        match self {
            CommandOrigin::Manual => AngleSource::Manual,
            CommandOrigin::Auto(_) => AngleSource::Auto,
            CommandOrigin::SafetyOverride => AngleSource::SafetyOverride,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AxisState {
    pub angle: ServoAngle,
    pub source: AngleSource,
    /// Auto-tracking owns the axis; manual edits are refused.
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RigSnapshot {
    pub base: AxisState,
    pub panel: AxisState,
    pub endpoint: String,
    pub auto_session: Option<Uuid>,
}

#[derive(Debug)]
struct AxisValue {
    angle: ServoAngle,
    source: AngleSource,
}

#[derive(Debug)]
struct RigState {
    base: AxisValue,
    panel: AxisValue,
    auto_session: Option<Uuid>,
}

impl RigState {
    fn axis_mut(&mut self, axis: Axis) -> &mut AxisValue {
        match axis {
            Axis::Base => &mut self.base,
            Axis::Panel => &mut self.panel,
        }
    }

    fn axis(&self, axis: Axis) -> &AxisValue {
        match axis {
            Axis::Base => &self.base,
            Axis::Panel => &self.panel,
        }
    }
}

/// The two servos as this process last commanded them.
///
/// Every angle change goes through [`Rig::command`], which records the new
/// value and hands the request to the gateway.
#[derive(Clone)]
pub struct Rig {
    gateway: ServoGateway,
    state: Arc<StdMutex<RigState>>,
    notices: Notices,
}

impl Rig {
    pub fn new(gateway: ServoGateway, notices: Notices) -> Self {
        let initial = || AxisValue {
            angle: ServoAngle::CENTER,
            source: AngleSource::Manual,
        };
        Self {
            gateway,
            state: Arc::new(StdMutex::new(RigState {
                base: initial(),
                panel: initial(),
                auto_session: None,
            })),
            notices,
        }
    }

    pub fn gateway(&self) -> &ServoGateway {
        &self.gateway
    }

    pub fn angle(&self, axis: Axis) -> ServoAngle {
        self.state.lock().unwrap().axis(axis).angle
    }

    pub fn auto_session(&self) -> Option<Uuid> {
        self.state.lock().unwrap().auto_session
    }

    pub fn is_auto_owned(&self) -> bool {
        self.auto_session().is_some()
    }

    pub fn snapshot(&self) -> RigSnapshot {
        let state = self.state.lock().unwrap();
        let locked = state.auto_session.is_some();
        let axis_state = |value: &AxisValue| AxisState {
            angle: value.angle,
            source: value.source,
            locked,
        };
        RigSnapshot {
            base: axis_state(&state.base),
            panel: axis_state(&state.panel),
            endpoint: self.gateway.endpoint(),
            auto_session: state.auto_session,
        }
    }

    pub(crate) fn claim_for_auto(&self, session: Uuid) {
        self.state.lock().unwrap().auto_session = Some(session);
    }

    /// Releases the lock only if `session` still holds it.
    pub(crate) fn release_auto(&self, session: Uuid) {
        let mut state = self.state.lock().unwrap();
        if state.auto_session == Some(session) {
            state.auto_session = None;
        }
    }

    /// Records and dispatches a new angle. Returns the command id.
    ///
    /// Failures are posted as notices when they arrive, except for
    /// auto-tracking commands whose session has since ended.
    pub fn command(&self, axis: Axis, angle: i32, origin: CommandOrigin) -> Uuid {
        let angle = ServoAngle::clamped(angle);
        {
            let mut state = self.state.lock().unwrap();
            let value = state.axis_mut(axis);
            value.angle = angle;
            value.source = origin.source();
        }

        let pending = self.gateway.set_angle(axis, angle.get());
        let id = pending.id();
        let state = self.state.clone();
        let notices = self.notices.clone();

        tokio::spawn(async move {
            let url = pending.url().to_string();
            match pending.outcome().await {
                Ok(()) => log::debug!("{} servo at {} ({})", axis, angle, url),
                Err(e) => {
                    if let CommandOrigin::Auto(session) = origin {
                        if state.lock().unwrap().auto_session != Some(session) {
                            log::debug!(
                                "Discarding result of stale tracking command {}: {}",
                                id,
                                e
                            );
                            return;
                        }
                    }
                    notices.post(Notice::ActuatorError {
                        axis,
                        angle,
                        message: e.to_string(),
                    });
                }
            }
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::GatewayTimeouts;
    use crate::testing::MockActuator;
    use axum::http::StatusCode;
    use std::time::Duration;

    fn rig(url: &str) -> (Rig, Notices) {
        let notices = Notices::new();
        let gateway = ServoGateway::new(url, GatewayTimeouts::default()).unwrap();
        (Rig::new(gateway, notices.clone()), notices)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    #[tokio::test]
    async fn test_command_records_and_dispatches() {
        let actuator = MockActuator::start().await;
        let (rig, notices) = rig(&actuator.url);

        assert_eq!(rig.angle(Axis::Base), ServoAngle::CENTER);
        rig.command(Axis::Base, 300, CommandOrigin::Manual);
        assert_eq!(rig.angle(Axis::Base), ServoAngle::MAX);

        let hits = actuator.wait_for_hits(1).await;
        assert_eq!(hits[0].angle, 180);
        settle().await;
        assert!(notices.recent().is_empty());
    }

    #[tokio::test]
    async fn test_failure_posts_notice() {
        let actuator = MockActuator::with_status(StatusCode::SERVICE_UNAVAILABLE).await;
        let (rig, notices) = rig(&actuator.url);

        rig.command(Axis::Panel, 45, CommandOrigin::Manual);
        actuator.wait_for_hits(1).await;
        settle().await;

        let recent = notices.recent();
        assert_eq!(recent.len(), 1);
        assert!(matches!(
            recent[0].notice,
            Notice::ActuatorError { axis: Axis::Panel, .. }
        ));
    }

    #[tokio::test]
    async fn test_stale_auto_failure_is_discarded() {
        let actuator = MockActuator::with_status(StatusCode::BAD_GATEWAY).await;
        let (rig, notices) = rig(&actuator.url);

        let session = Uuid::new_v4();
        rig.claim_for_auto(session);
        rig.command(Axis::Base, 10, CommandOrigin::Auto(session));
        rig.release_auto(session);

        actuator.wait_for_hits(1).await;
        settle().await;
        assert!(notices.recent().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_reports_lock_and_source() {
        let actuator = MockActuator::start().await;
        let (rig, _) = rig(&actuator.url);
        let session = Uuid::new_v4();

        rig.claim_for_auto(session);
        rig.command(Axis::Panel, 60, CommandOrigin::Auto(session));
        let snap = rig.snapshot();
        assert!(snap.base.locked && snap.panel.locked);
        assert_eq!(snap.panel.source, AngleSource::Auto);
        assert_eq!(snap.panel.angle.get(), 60);
        assert_eq!(snap.auto_session, Some(session));

        rig.release_auto(Uuid::new_v4());
        assert!(rig.is_auto_owned());
        rig.release_auto(session);
        assert!(!rig.snapshot().panel.locked);
    }
}
