//! Business logic powering the operator REST routes: generating and installing
//! a quiz, and advancing through it.

use tracing::{info, warn};

use crate::{
    dto::{
        admin::{AdvanceResponse, LoadQuizRequest, LoadQuizResponse},
        common::QuestionPayload,
    },
    error::ServiceError,
    services::{
        events, game_service,
        generation_service::{GenerationPipeline, RetryPolicy},
    },
    state::{SharedState, state_machine::Advance},
};

/// Generate a quiz from the submitted notes and make it the active question set.
///
/// Only one generation may run at a time; the session lock is not held while
/// the generative backend is working, so participants keep joining meanwhile.
pub async fn load_quiz(
    state: &SharedState,
    request: LoadQuizRequest,
) -> Result<LoadQuizResponse, ServiceError> {
    let text = request
        .mom
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("No text provided".into()))?;

    let source = state
        .question_source()
        .await
        .ok_or(ServiceError::Degraded)?;

    let _generation = state.try_claim_generation().map_err(|_| {
        warn!("quiz load rejected: another generation is in flight");
        ServiceError::InvalidState("a quiz is already being generated".into())
    })?;

    info!(chars = text.chars().count(), "generating quiz from meeting notes");
    let policy = RetryPolicy::from(&state.config().generation);
    let quiz = GenerationPipeline::new(source, policy)
        .generate(&text)
        .await?;
    let question_count = quiz.len();

    state
        .with_session_mut(|session| {
            session.load_new_quiz(quiz);
            info!(question_count, epoch = session.epoch(), "quiz installed");
            events::broadcast_quiz_loaded(state, question_count);
            events::broadcast_roster(state, session);
        })
        .await;

    Ok(LoadQuizResponse {
        success: true,
        message: "Quiz Loaded".into(),
        question_count,
    })
}

/// Operator advance over HTTP; same effect as the websocket message.
pub async fn next_question(state: &SharedState) -> AdvanceResponse {
    match game_service::advance_question(state).await {
        Advance::Question(opened) => AdvanceResponse {
            finished: false,
            question: Some(QuestionPayload::from(opened)),
        },
        Advance::Finished => AdvanceResponse {
            finished: true,
            question: None,
        },
    }
}
