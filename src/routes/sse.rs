use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::validation::validate_room_code,
    error::AppError,
    services::sse_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/rooms/{code}",
    tag = "sse",
    params(("code" = String, Path, description = "Code of the room to observe")),
    responses(
        (status = 200, description = "Room event stream", content_type = "text/event-stream", body = String),
        (status = 400, description = "Malformed room code")
    )
)]
/// Stream a room's realtime events to host dashboards and projector views.
pub async fn room_stream(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    validate_room_code(&code).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let receiver = sse_service::subscribe_room(&state, &code);
    info!(room = %code, "new room SSE connection");
    sse_service::broadcast_room_info(&state, &code, "room stream connected");
    Ok(sse_service::to_sse_stream(receiver, code))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/rooms/{code}", get(room_stream))
}
