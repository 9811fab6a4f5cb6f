//! Operator routes.

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::admin::{AdvanceResponse, LoadQuizRequest, LoadQuizResponse},
    error::{AppError, ErrorBody},
    services::admin_service,
    state::SharedState,
};

/// Operator endpoints driving the quiz.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/load-quiz", post(load_quiz))
        .route("/admin/next-question", post(next_question))
}

/// Generate a quiz from meeting notes and make it the active question set.
#[utoipa::path(
    post,
    path = "/admin/load-quiz",
    tag = "admin",
    request_body = LoadQuizRequest,
    responses(
        (status = 200, description = "Quiz generated and installed", body = LoadQuizResponse),
        (status = 400, description = "No text provided", body = ErrorBody),
        (status = 409, description = "Another quiz is being generated", body = ErrorBody),
        (status = 500, description = "Every generation attempt failed", body = ErrorBody),
        (status = 503, description = "No generative backend configured", body = ErrorBody)
    )
)]
pub async fn load_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<LoadQuizRequest>,
) -> Result<Json<LoadQuizResponse>, AppError> {
    Ok(Json(admin_service::load_quiz(&state, payload).await?))
}

/// Open the next question, or finish the quiz after the last one.
#[utoipa::path(
    post,
    path = "/admin/next-question",
    tag = "admin",
    responses((status = 200, description = "Cursor advanced", body = AdvanceResponse))
)]
pub async fn next_question(State(state): State<SharedState>) -> Json<AdvanceResponse> {
    Json(admin_service::next_question(&state).await)
}
