use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::{room::RoomSummary, validation::validate_room_code},
    error::AppError,
    services::quiz_service,
    state::SharedState,
};

/// Routes exposing read-only room inspection.
pub fn router() -> Router<SharedState> {
    Router::new().route("/rooms/{code}", get(get_room))
}

/// Inspect the live state of a room: phase, players, and standings.
#[utoipa::path(
    get,
    path = "/rooms/{code}",
    tag = "rooms",
    params(("code" = String, Path, description = "Code of the room to inspect")),
    responses(
        (status = 200, description = "Room state", body = RoomSummary),
        (status = 404, description = "No active room with this code")
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<RoomSummary>, AppError> {
    validate_room_code(&code).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let Some(room_arc) = state.room(&code) else {
        // Fall back to a 404 that distinguishes "quiz exists but nobody joined"
        // from "no such code at all".
        return match quiz_service::fetch_quiz(&state, &code).await {
            Ok(_) => Err(AppError::NotFound(format!(
                "room `{code}` has no connected players"
            ))),
            Err(_) => Err(AppError::NotFound(format!("room `{code}` not found"))),
        };
    };
    let room = room_arc.lock().await;
    Ok(Json(RoomSummary::from_room(&code, &room)))
}
