//! Generation pipeline: turns free text into a validated [`QuestionSet`] through
//! an unreliable generative backend, with a bounded number of attempts.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::{
    config::GenerationConfig,
    dao::{
        generation::GenerationError,
        question_source::{GenerationRequest, QuestionSource},
    },
    dto::validation::{QuizValidationError, validate_question_set},
    state::quiz::QuestionSet,
};

/// Output contract sent with every generation request.
pub const QUIZ_INSTRUCTIONS: &str = r#"You are a quiz generator API.
Analyze the provided meeting minutes (MOM) and generate exactly 10 multiple-choice questions.

RULES:
1. Return ONLY a raw JSON array. No text before or after.
2. Each question MUST have exactly 4 options.
3. 'correctIndex' must be the integer 0, 1, 2, or 3 (the position of the correct option).

JSON STRUCTURE:
[
  {
    "id": 1,
    "question": "Question text here?",
    "options": ["Red Option", "Blue Option", "Green Option", "Yellow Option"],
    "correctIndex": 0
  }
]"#;

/// Why a single attempt did not produce a usable question set.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The backend call itself failed.
    #[error("generative backend failed")]
    Backend(#[from] GenerationError),
    /// The backend did not answer within the per-attempt limit.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    /// The output, once unfenced, is not JSON.
    #[error("output is not valid JSON")]
    Parse(#[source] serde_json::Error),
    /// The JSON does not describe a usable question set.
    #[error("output failed validation")]
    Validation(#[from] QuizValidationError),
}

/// Every attempt failed; the pipeline gave up.
#[derive(Debug, Error)]
#[error("quiz generation failed after {attempts} attempts")]
pub struct GenerationExhausted {
    /// Number of backend calls made.
    pub attempts: u32,
    /// Cause of the final failed attempt.
    #[source]
    pub last_error: AttemptError,
}

/// Attempt counter, ceiling and constant backoff of the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Backend calls allowed per request; zero is treated as one.
    pub max_attempts: u32,
    /// Sleep between two failed attempts.
    pub backoff: Duration,
    /// Limit on a single backend call, if any.
    pub attempt_timeout: Option<Duration>,
}

impl From<&GenerationConfig> for RetryPolicy {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: config.backoff,
            attempt_timeout: config.attempt_timeout,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        (&GenerationConfig::default()).into()
    }
}

/// Stateless pipeline; one instance may serve any number of requests.
pub struct GenerationPipeline {
    source: Arc<dyn QuestionSource>,
    policy: RetryPolicy,
}

impl GenerationPipeline {
    /// Pipeline calling `source` under `policy`.
    pub fn new(source: Arc<dyn QuestionSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Generate a question set from `source_text`.
    ///
    /// Returns on the first valid output. Between failed attempts the task
    /// sleeps for the backoff interval, yielding to other work. After
    /// `max_attempts` failures the last cause is returned inside
    /// [`GenerationExhausted`].
    pub async fn generate(&self, source_text: &str) -> Result<QuestionSet, GenerationExhausted> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            info!(attempt, max_attempts, "requesting quiz from generative backend");
            let err = match self.attempt(source_text).await {
                Ok(quiz) => {
                    info!(attempt, question_count = quiz.len(), "quiz generated");
                    let ids: Vec<&str> = quiz.iter().map(|q| q.id.as_str()).collect();
                    debug!(?ids, "generated question ids");
                    return Ok(quiz);
                }
                Err(err) => err,
            };

            warn!(
                attempt,
                max_attempts,
                error = %err,
                cause = ?err,
                "quiz generation attempt failed"
            );
            if attempt >= max_attempts {
                error!(attempts = attempt, "all quiz generation attempts failed");
                return Err(GenerationExhausted {
                    attempts: attempt,
                    last_error: err,
                });
            }

            info!(backoff = ?self.policy.backoff, "waiting before next generation attempt");
            sleep(self.policy.backoff).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, source_text: &str) -> Result<QuestionSet, AttemptError> {
        let request = GenerationRequest {
            instructions: QUIZ_INSTRUCTIONS,
            source_text: source_text.to_string(),
        };
        let call = self.source.generate(request);
        let raw = match self.policy.attempt_timeout {
            Some(limit) => timeout(limit, call)
                .await
                .map_err(|_| AttemptError::Timeout(limit))??,
            None => call.await?,
        };

        let value = serde_json::from_str(strip_code_fence(&raw)).map_err(AttemptError::Parse)?;
        Ok(validate_question_set(value)?)
    }
}

/// Remove an optional surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;
    use tokio::time::Instant;

    use super::*;
    use crate::dao::{
        generation::GenerationResult,
        question_source::testing::{ScriptedSource, valid_quiz_json},
    };

    fn pipeline(source: Arc<ScriptedSource>) -> GenerationPipeline {
        GenerationPipeline::new(source, RetryPolicy::default())
    }

    /// The paused clock jumps straight to timer deadlines, rounded to the millisecond.
    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "expected ~{expected:?}, got {elapsed:?}"
        );
    }

    #[test]
    fn strips_optional_code_fences() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  ```\n[2]```  "), "[2]");
        assert_eq!(strip_code_fence("[3]"), "[3]");
        assert_eq!(strip_code_fence("```json[4]"), "[4]");
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_malformed_outputs() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok("Sure! Here is your quiz:".into()),
            Ok(r#"[{"id": 1, "question": "Q?", "options": ["a", "b", "c"], "correctIndex": 0}]"#.into()),
            Ok(format!("```json\n{}\n```", valid_quiz_json(10))),
        ]));

        let start = Instant::now();
        let quiz = pipeline(source.clone()).generate("minutes").await.unwrap();

        assert_eq!(quiz.len(), 10);
        assert_eq!(source.calls(), 3);
        assert_elapsed(start, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_three_failures_with_two_backoffs() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok("not json".into()),
            Err(GenerationError::EmptyResponse),
            Ok("[]".into()),
        ]));

        let start = Instant::now();
        let err = pipeline(source.clone()).generate("minutes").await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert!(matches!(
            err.last_error,
            AttemptError::Validation(QuizValidationError::Empty)
        ));
        assert_eq!(source.calls(), 3);
        assert_elapsed(start, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_consumes_a_single_attempt() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(valid_quiz_json(10))]));

        let start = Instant::now();
        let quiz = pipeline(source.clone()).generate("minutes").await.unwrap();

        assert_eq!(quiz.len(), 10);
        assert_eq!(source.calls(), 1);
        assert_elapsed(start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn honours_configured_attempt_ceiling() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let policy = RetryPolicy {
            max_attempts: 5,
            backoff: Duration::from_millis(100),
            attempt_timeout: None,
        };

        let err = GenerationPipeline::new(source.clone(), policy)
            .generate("minutes")
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 5);
        assert_eq!(source.calls(), 5);
    }

    struct StalledSource;

    impl QuestionSource for StalledSource {
        fn generate(
            &self,
            _request: GenerationRequest,
        ) -> BoxFuture<'static, GenerationResult<String>> {
            Box::pin(futures::future::pending())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_backend_is_cut_off_by_attempt_timeout() {
        let policy = RetryPolicy {
            max_attempts: 2,
            backoff: Duration::from_secs(2),
            attempt_timeout: Some(Duration::from_secs(10)),
        };

        let start = Instant::now();
        let err = GenerationPipeline::new(Arc::new(StalledSource), policy)
            .generate("minutes")
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 2);
        assert!(matches!(err.last_error, AttemptError::Timeout(_)));
        assert_elapsed(start, Duration::from_secs(22));
    }
}
