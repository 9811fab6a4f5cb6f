//! Validation of generated quiz data at the system boundary.
//!
//! Raw JSON produced by the generative backend is turned into a strictly-typed
//! [`QuestionSet`] here; nothing downstream handles untyped data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::state::quiz::{OPTION_COUNT, Question, QuestionSet};

/// Reasons a generated question set is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizValidationError {
    /// The top-level value is not an array.
    #[error("expected a JSON array of questions")]
    NotASequence,
    /// The array has no element.
    #[error("question set is empty")]
    Empty,
    /// An element is missing a field or has the wrong JSON type.
    #[error("question #{position} is malformed: {reason}")]
    Malformed {
        /// 1-based position of the element.
        position: usize,
        /// Deserializer message.
        reason: String,
    },
    /// An element parsed but breaks a rule (option count, index range, blank text).
    #[error("question #{position} is invalid: {reason}")]
    Invalid {
        /// 1-based position of the element.
        position: usize,
        /// The broken rules, as reported by the validator.
        reason: String,
    },
}

/// Question identifier as emitted by the generator: a number or a label.
///
/// `Serialize` lets validation errors carry the offending value as a parameter.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum RawQuestionId {
    Number(u64),
    Text(String),
}

impl RawQuestionId {
    fn into_string(self) -> String {
        match self {
            RawQuestionId::Number(value) => value.to_string(),
            RawQuestionId::Text(value) => value,
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[validate(custom(function = "validate_question_id"))]
    id: RawQuestionId,
    #[validate(custom(function = "validate_not_blank"))]
    question: String,
    #[validate(length(equal = 4, message = "options must contain exactly 4 entries"))]
    options: Vec<String>,
    /// Accepts `2` as well as `"2"`; anything else fails to parse.
    #[serde(alias = "correct_index")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[validate(range(min = 0, max = 3, message = "correctIndex must be 0, 1, 2 or 3"))]
    correct_index: i64,
}

fn validate_question_id(id: &RawQuestionId) -> Result<(), ValidationError> {
    match id {
        RawQuestionId::Text(value) if value.trim().is_empty() => {
            let mut err = ValidationError::new("question_id_blank");
            err.message = Some("id must not be blank".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("question_text_blank");
        err.message = Some("question text must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl TryFrom<RawQuestion> for Question {
    type Error = String;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let options: [String; OPTION_COUNT] =
            raw.options.try_into().map_err(|options: Vec<String>| {
                format!("expected 4 options, got {}", options.len())
            })?;
        let correct_index = u8::try_from(raw.correct_index)
            .map_err(|_| format!("correctIndex {} out of range", raw.correct_index))?;

        Ok(Question {
            id: raw.id.into_string(),
            text: raw.question,
            options,
            correct_index,
        })
    }
}

/// Check the shape of generated quiz data and convert it into a [`QuestionSet`].
///
/// Every element is checked, not only the first one.
pub fn validate_question_set(raw: Value) -> Result<QuestionSet, QuizValidationError> {
    let Value::Array(items) = raw else {
        return Err(QuizValidationError::NotASequence);
    };
    if items.is_empty() {
        return Err(QuizValidationError::Empty);
    }

    let mut questions = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let position = index + 1;
        let raw = RawQuestion::deserialize(item).map_err(|err| QuizValidationError::Malformed {
            position,
            reason: err.to_string(),
        })?;
        raw.validate()
            .map_err(|errors| QuizValidationError::Invalid {
                position,
                reason: errors.to_string(),
            })?;
        let question = Question::try_from(raw)
            .map_err(|reason| QuizValidationError::Invalid { position, reason })?;
        questions.push(question);
    }

    Ok(QuestionSet::new(questions))
}
