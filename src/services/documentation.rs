
use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Quiz Live Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::admin::load_quiz,
        crate::routes::admin::next_question,
        crate::routes::public::get_session,
        crate::routes::sse::public_stream,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::admin::LoadQuizRequest,
            crate::dto::admin::LoadQuizResponse,
            crate::dto::admin::AdvanceResponse,
            crate::dto::common::PlayerSummary,
            crate::dto::common::QuestionPayload,
            crate::dto::phase::VisibleQuizPhase,
            crate::dto::public::SessionSnapshot,
            crate::dto::sse::QuizLoadedEvent,
            crate::dto::sse::GameOverEvent,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::AnswerResult,
            crate::dto::ws::RejectionNotice,
            crate::dto::ws::ConnectedNotice,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "admin", description = "Operator endpoints driving the quiz"),
        (name = "public", description = "Read-only session state"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "participants", description = "WebSocket operations for participants and screens"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/admin/load-quiz",
            "/admin/next-question",
            "/public/session",
            "/sse/public",
            "/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
