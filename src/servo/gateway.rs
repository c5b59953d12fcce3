use reqwest::{Client, StatusCode};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::error::ServoError;
use super::types::{Axis, ServoAngle};

pub const DEFAULT_ENDPOINT: &str = "http://192.168.63.219";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            read: Duration::from_secs(5),
        }
    }
}

/// A servo command that has been handed to its own task.
pub struct PendingCommand {
    id: Uuid,
    angle: ServoAngle,
    url: String,
    join: JoinHandle<Result<(), ServoError>>,
}

impl PendingCommand {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn angle(&self) -> ServoAngle {
        self.angle
    }

    /// URL the command was sent to, fixed at dispatch time.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn outcome(self) -> Result<(), ServoError> {
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(ServoError::Aborted(e.to_string())),
        }
    }
}

/// HTTP client for the actuator's `/baseServo` and `/panelServo` endpoints.
///
/// Cloning is cheap; clones share the endpoint.
#[derive(Clone)]
pub struct ServoGateway {
    http_client: Client,
    endpoint: Arc<RwLock<String>>,
}

impl ServoGateway {
    pub fn new(endpoint: &str, timeouts: GatewayTimeouts) -> Result<Self, ServoError> {
        let http_client = Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()
            .map_err(|e| ServoError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: Arc::new(RwLock::new(normalize_endpoint(endpoint))),
        })
    }

    pub fn endpoint(&self) -> String {
        self.endpoint.read().unwrap().clone()
    }

    /// Applies to commands dispatched after this call; in-flight ones keep
    /// their URL. Returns the normalized endpoint and whether it changed.
    pub fn update_endpoint(&self, endpoint: &str) -> (String, bool) {
        let normalized = normalize_endpoint(endpoint);
        let previous = std::mem::replace(&mut *self.endpoint.write().unwrap(), normalized.clone());
        let changed = previous != normalized;
        if changed {
            log::info!("Actuator endpoint updated to {}", normalized);
        } else {
            log::debug!("Actuator endpoint unchanged ({})", normalized);
        }
        (normalized, changed)
    }

    /// Clamps `angle` and sends it without waiting for the response.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_angle(&self, axis: Axis, angle: i32) -> PendingCommand {
        let angle = ServoAngle::clamped(angle);
        let url = format!("{}{}?angle={}", self.endpoint(), axis.path(), angle.get());
        let id = Uuid::new_v4();

        log::debug!("Dispatching {} command {} -> {}", axis, id, url);

        let client = self.http_client.clone();
        let request_url = url.clone();
        let join = tokio::spawn(async move { send(&client, &request_url).await });

        PendingCommand {
            id,
            angle,
            url,
            join,
        }
    }

    /// Checks `GET {endpoint}/`.
    pub async fn test_connection(&self) -> Result<(), ServoError> {
        let url = format!("{}/", self.endpoint());
        send(&self.http_client, &url).await
    }
}

async fn send(client: &Client, url: &str) -> Result<(), ServoError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServoError::from_transport(url, e))?;

    let status = response.status();
    if status == StatusCode::OK {
        log::debug!("Actuator request successful: {}", url);
        Ok(())
    } else {
        log::warn!("Actuator responded with code {} for {}", status.as_u16(), url);
        Err(ServoError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Trims whitespace and trailing slashes and defaults the scheme to http.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockActuator;
    use axum::http::StatusCode as AxumStatus;

    fn gateway(endpoint: &str) -> ServoGateway {
        ServoGateway::new(endpoint, GatewayTimeouts::default()).unwrap()
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("192.168.1.20"), "http://192.168.1.20");
        assert_eq!(normalize_endpoint(" 10.0.0.2:8080/ "), "http://10.0.0.2:8080");
        assert_eq!(normalize_endpoint("https://rig.local//"), "https://rig.local");
    }

    #[tokio::test]
    async fn test_set_angle_success() {
        let actuator = MockActuator::start().await;
        let gw = gateway(&actuator.url);

        let pending = gw.set_angle(Axis::Base, 120);
        assert_eq!(pending.url(), format!("{}/baseServo?angle=120", actuator.url));
        pending.outcome().await.unwrap();

        let hits = actuator.hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].axis, Axis::Base);
        assert_eq!(hits[0].angle, 120);
    }

    #[tokio::test]
    async fn test_out_of_range_is_clamped_before_dispatch() {
        let actuator = MockActuator::start().await;
        let gw = gateway(&actuator.url);

        let high = gw.set_angle(Axis::Base, 999);
        assert_eq!(high.angle(), ServoAngle::MAX);
        assert!(high.url().ends_with("/baseServo?angle=180"));
        high.outcome().await.unwrap();

        gw.set_angle(Axis::Panel, -40).outcome().await.unwrap();

        let hits = actuator.hits();
        assert!(hits.iter().all(|h| (0..=180).contains(&h.angle)));
        assert!(hits.iter().any(|h| h.axis == Axis::Base && h.angle == 180));
        assert!(hits.iter().any(|h| h.axis == Axis::Panel && h.angle == 0));
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let actuator = MockActuator::with_status(AxumStatus::INTERNAL_SERVER_ERROR).await;
        let gw = gateway(&actuator.url);

        let err = gw.set_angle(Axis::Panel, 10).outcome().await.unwrap_err();
        assert!(matches!(err, ServoError::Status { status: 500, .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_unreachable_is_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gw = gateway(&addr.to_string());
        let err = gw.set_angle(Axis::Base, 90).outcome().await.unwrap_err();
        assert!(matches!(
            err,
            ServoError::Unreachable { .. } | ServoError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let actuator = MockActuator::with_delay(Duration::from_millis(500)).await;
        let gw = ServoGateway::new(
            &actuator.url,
            GatewayTimeouts {
                connect: Duration::from_secs(1),
                read: Duration::from_millis(100),
            },
        )
        .unwrap();

        let err = gw.set_angle(Axis::Base, 45).outcome().await.unwrap_err();
        assert!(matches!(err, ServoError::Timeout { .. }));
    }

    #[test]
    fn test_update_endpoint_reports_changes() {
        let gw = gateway("10.0.0.7");
        assert_eq!(
            gw.update_endpoint("10.0.0.7/"),
            ("http://10.0.0.7".to_string(), false)
        );
        assert_eq!(
            gw.update_endpoint("http://10.0.0.8"),
            ("http://10.0.0.8".to_string(), true)
        );
        assert_eq!(gw.endpoint(), "http://10.0.0.8");
    }

    #[tokio::test]
    async fn test_endpoint_change_does_not_affect_in_flight() {
        let slow_a = MockActuator::with_delay(Duration::from_millis(200)).await;
        let b = MockActuator::start().await;
        let gw = gateway(&slow_a.url);

        let first = gw.set_angle(Axis::Base, 10);
        gw.update_endpoint(&b.url);
        let second = gw.set_angle(Axis::Base, 20);

        assert!(first.url().starts_with(&slow_a.url));
        assert!(second.url().starts_with(&b.url));

        let (first, second) = tokio::join!(first.outcome(), second.outcome());
        first.unwrap();
        second.unwrap();

        assert_eq!(slow_a.hits().len(), 1);
        assert_eq!(slow_a.hits()[0].angle, 10);
        assert_eq!(b.hits().len(), 1);
        assert_eq!(b.hits()[0].angle, 20);
    }

    #[tokio::test]
    async fn test_connection_check() {
        let actuator = MockActuator::start().await;
        gateway(&actuator.url).test_connection().await.unwrap();
    }
}
