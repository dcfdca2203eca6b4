/// Answer scoring and per-player progression.
pub mod answer_service;
/// Per-player question delivery.
pub mod dispatch_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Outbound event fan-out to sockets and SSE streams.
pub mod events;
/// Health check service.
pub mod health_service;
/// Quiz authoring and lookup operations.
pub mod quiz_service;
/// Room membership operations (join, kick, disconnect).
pub mod room_service;
/// Background eviction of idle rooms.
pub mod room_sweeper;
/// Quiz session lifecycle (countdown, start, finish).
pub mod session_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
