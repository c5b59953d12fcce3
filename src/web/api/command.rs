use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::control::CommandOutcome;
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommandRequest {
    /// Voice transcript or typed command, e.g. "panel to zero".
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/api/command",
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Parsed command and its result", body = CommandOutcome)
    ),
    tag = "command"
)]
pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandOutcome> {
    Json(state.control.execute_text(&request.text).await)
}
