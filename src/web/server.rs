use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::control::ControlContext;

use super::api::command as command_handlers;
use super::api::notices as notice_handlers;
use super::api::servo as servo_handlers;
use super::api::solar as solar_handlers;
use super::api::tracking as tracking_handlers;
use super::api::weather as weather_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(control: Arc<ControlContext>) -> Router {
    let state = AppState { control };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Tracking
        .route("/api/tracking/status", get(tracking_handlers::status))
        .route("/api/tracking/enable", post(tracking_handlers::enable))
        .route("/api/tracking/disable", post(tracking_handlers::disable))
        .route(
            "/api/location",
            post(tracking_handlers::post_fix).delete(tracking_handlers::reset_location),
        )
        // Servos and actuator
        .route("/api/servo", get(servo_handlers::snapshot))
        .route("/api/servo/{axis}", post(servo_handlers::set_angle))
        .route("/api/servo/{axis}/adjust", post(servo_handlers::adjust))
        .route(
            "/api/actuator",
            get(servo_handlers::get_endpoint).put(servo_handlers::put_endpoint),
        )
        .route("/api/actuator/test", post(servo_handlers::test_endpoint))
        // Commands, weather, sun
        .route("/api/command", post(command_handlers::execute))
        .route("/api/weather", post(weather_handlers::fetch))
        .route(
            "/api/weather/observation",
            post(weather_handlers::observation),
        )
        .route("/api/solar", get(solar_handlers::position))
        .route("/api/notices", get(notice_handlers::list))
        .route("/api/notices/stream", get(notice_handlers::stream))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(bind_addr: &str, control: Arc<ControlContext>) -> std::io::Result<()> {
    let app = router(control);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await
}
