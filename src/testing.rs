//! In-process stand-in for the rig's HTTP actuator.

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use serde::Deserialize;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use crate::servo::Axis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub axis: Axis,
    pub angle: i32,
}

#[derive(Deserialize)]
struct AngleQuery {
    angle: i32,
}

pub struct MockActuator {
    pub url: String,
    hits: Arc<StdMutex<Vec<Hit>>>,
}

impl MockActuator {
    pub async fn start() -> Self {
        Self::spawn(StatusCode::OK, Duration::ZERO).await
    }

    pub async fn with_status(status: StatusCode) -> Self {
        Self::spawn(status, Duration::ZERO).await
    }

    pub async fn with_delay(delay: Duration) -> Self {
        Self::spawn(StatusCode::OK, delay).await
    }

    async fn spawn(status: StatusCode, delay: Duration) -> Self {
        let hits = Arc::new(StdMutex::new(Vec::new()));

        let servo_route = |axis: Axis| {
            let hits = hits.clone();
            get(move |Query(q): Query<AngleQuery>| async move {
                hits.lock().unwrap().push(Hit {
                    axis,
                    angle: q.angle,
                });
                tokio::time::sleep(delay).await;
                status
            })
        };

        let app = Router::new()
            .route("/", get(move || async move { status }))
            .route("/baseServo", servo_route(Axis::Base))
            .route("/panelServo", servo_route(Axis::Panel));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            hits,
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Polls until at least `count` requests arrived, or two seconds pass.
    pub async fn wait_for_hits(&self, count: usize) -> Vec<Hit> {
        for _ in 0..200 {
            let hits = self.hits();
            if hits.len() >= count {
                return hits;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.hits()
    }
}
