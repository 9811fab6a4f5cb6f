//! Public read-only routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::public::SessionSnapshot, services::public_service, state::SharedState};

/// Public read-only endpoints that expose the live session.
pub fn router() -> Router<SharedState> {
    Router::new().route("/public/session", get(get_session))
}

#[utoipa::path(
    get,
    path = "/public/session",
    tag = "public",
    responses((status = 200, description = "Current session state", body = SessionSnapshot))
)]
/// Return the phase, open question, roster and leaderboard.
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionSnapshot> {
    Json(public_service::get_session(&state).await)
}
