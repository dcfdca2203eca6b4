use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Quiz Room Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::quizzes::upsert_quiz,
        crate::routes::quizzes::get_quiz,
        crate::routes::rooms::get_room,
        crate::routes::sse::room_stream,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::quiz::UpsertQuizRequest,
            crate::dto::quiz::QuizSummary,
            crate::dto::room::RoomSummary,
            crate::dto::room::PlayerSummary,
            crate::dto::room::QuizSnapshotView,
            crate::dto::room::QuestionView,
            crate::dto::phase::VisibleRoomPhase,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "quizzes", description = "Quiz authoring and lookup"),
        (name = "rooms", description = "Room inspection endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "players", description = "WebSocket operations for player clients"),
    )
)]
pub struct ApiDoc;
