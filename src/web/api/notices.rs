use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::notice::NoticeRecord;
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/notices",
    responses(
        (status = 200, description = "Recent notices, oldest first", body = Vec<NoticeRecord>)
    ),
    tag = "notices"
)]
pub async fn list(State(state): State<AppState>) -> Json<Vec<NoticeRecord>> {
    Json(state.control.notices().recent())
}

/// Live notices as server-sent `notice` events.
#[utoipa::path(
    get,
    path = "/api/notices/stream",
    responses(
        (status = 200, description = "One `notice` event per posted notice",
            body = NoticeRecord, content_type = "text/event-stream")
    ),
    tag = "notices"
)]
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.control.notices().subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(record) => {
                    let event = Event::default().event("notice").json_data(&record);
                    return Some((event, rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Notice stream client lagging, skipped {} notices", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
