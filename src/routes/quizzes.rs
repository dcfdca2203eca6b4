use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        quiz::{QuizSummary, UpsertQuizRequest},
        validation::validate_room_code,
    },
    error::AppError,
    services::quiz_service,
    state::SharedState,
};

/// Routes handling quiz authoring and lookup.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/quizzes", put(upsert_quiz))
        .route("/quizzes/{code}", get(get_quiz))
}

/// Store or replace a quiz definition keyed by its room code.
#[utoipa::path(
    put,
    path = "/quizzes",
    tag = "quizzes",
    request_body = UpsertQuizRequest,
    responses(
        (status = 200, description = "Quiz stored", body = QuizSummary),
        (status = 400, description = "Invalid quiz definition"),
        (status = 503, description = "Quiz store unavailable")
    )
)]
pub async fn upsert_quiz(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpsertQuizRequest>>,
) -> Result<Json<QuizSummary>, AppError> {
    let summary = quiz_service::upsert_quiz(&state, payload).await?;
    Ok(Json(summary))
}

/// Fetch a stored quiz definition including answer keys.
#[utoipa::path(
    get,
    path = "/quizzes/{code}",
    tag = "quizzes",
    params(("code" = String, Path, description = "Room code the quiz is stored under")),
    responses(
        (status = 200, description = "Quiz definition", body = QuizSummary),
        (status = 404, description = "No quiz stored under this code")
    )
)]
pub async fn get_quiz(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<QuizSummary>, AppError> {
    validate_room_code(&code).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let summary = quiz_service::fetch_quiz(&state, &code).await?;
    Ok(Json(summary))
}
