/// Operator operations: quiz loading and advancing.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Outbound broadcasts and private messages.
pub mod events;
/// Realtime gateway operations bound to a connection.
pub mod game_service;
/// Retrying quiz generation pipeline.
pub mod generation_service;
/// Health check service.
pub mod health_service;
/// Public read-only session projection.
pub mod public_service;
/// Server-Sent Events streaming service.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
