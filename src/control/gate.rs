use crate::servo::{Axis, CommandOrigin, Rig};

/// Lets manual angle changes through only while auto-tracking is off.
#[derive(Clone)]
pub struct ManualControlGate {
    rig: Rig,
}

impl ManualControlGate {
    pub fn new(rig: Rig) -> Self {
        Self { rig }
    }

    /// Returns whether the change was accepted. Refusals are silent.
    pub fn attempt_manual_change(&self, axis: Axis, angle: i32) -> bool {
        if self.rig.is_auto_owned() {
            log::debug!(
                "Ignoring manual {} change to {}: auto tracking active",
                axis,
                angle
            );
            return false;
        }
        self.rig.command(axis, angle, CommandOrigin::Manual);
        true
    }

    /// Relative variant of [`Self::attempt_manual_change`].
    pub fn attempt_manual_adjust(&self, axis: Axis, delta: i32) -> bool {
        if self.rig.is_auto_owned() {
            log::debug!(
                "Ignoring manual {} adjust by {}: auto tracking active",
                axis,
                delta
            );
            return false;
        }
        let target = self.rig.angle(axis).offset(delta);
        self.rig.command(axis, target.get(), CommandOrigin::Manual);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Notices;
    use crate::servo::{AngleSource, GatewayTimeouts, ServoAngle, ServoGateway};
    use crate::testing::MockActuator;
    use std::time::Duration;
    use uuid::Uuid;

    async fn setup() -> (MockActuator, Rig, ManualControlGate) {
        let actuator = MockActuator::start().await;
        let gateway = ServoGateway::new(&actuator.url, GatewayTimeouts::default()).unwrap();
        let rig = Rig::new(gateway, Notices::new());
        let gate = ManualControlGate::new(rig.clone());
        (actuator, rig, gate)
    }

    #[tokio::test]
    async fn test_accepts_while_idle() {
        let (actuator, rig, gate) = setup().await;

        assert!(gate.attempt_manual_change(Axis::Panel, 120));
        assert_eq!(rig.angle(Axis::Panel).get(), 120);
        assert_eq!(rig.snapshot().panel.source, AngleSource::Manual);

        let hits = actuator.wait_for_hits(1).await;
        assert_eq!(hits[0].axis, Axis::Panel);
        assert_eq!(hits[0].angle, 120);
    }

    #[tokio::test]
    async fn test_rejects_while_tracking() {
        let (actuator, rig, gate) = setup().await;
        rig.claim_for_auto(Uuid::new_v4());

        assert!(!gate.attempt_manual_change(Axis::Base, 10));
        assert!(!gate.attempt_manual_adjust(Axis::Panel, 15));
        assert_eq!(rig.angle(Axis::Base), ServoAngle::CENTER);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(actuator.hits().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_is_relative_and_clamped() {
        let (actuator, rig, gate) = setup().await;

        assert!(gate.attempt_manual_adjust(Axis::Base, -15));
        assert_eq!(rig.angle(Axis::Base).get(), 75);

        gate.attempt_manual_change(Axis::Panel, 170);
        gate.attempt_manual_adjust(Axis::Panel, 15);
        assert_eq!(rig.angle(Axis::Panel), ServoAngle::MAX);

        let hits = actuator.wait_for_hits(3).await;
        assert!(hits.iter().any(|h| h.axis == Axis::Panel && h.angle == 180));
    }
}
