//! Forward-only question cursor driving the live quiz.
//!
//! The machine has no storage of its own: the phase is derived from the
//! [`Session`] cursor so the two can never disagree.

use tracing::{debug, info};

use crate::state::{quiz::QuestionSet, session::Session};

/// High-level phases the quiz can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// A question set may be loaded, but no question was opened yet.
    NotStarted,
    /// The question at `index` accepts answers.
    QuestionOpen {
        /// Cursor position of the open question.
        index: usize,
    },
    /// Every question has been played.
    Finished,
}

/// Public view of a freshly opened question. The correct index is withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedQuestion {
    /// Cursor position.
    pub index: usize,
    /// Question text.
    pub text: String,
    /// Answer options in index order.
    pub options: Vec<String>,
}

/// Result of an operator-triggered advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A new question is open for answers.
    Question(OpenedQuestion),
    /// The cursor moved past the last question.
    Finished,
}

impl Session {
    /// Inspect the current phase.
    pub fn phase(&self) -> QuizPhase {
        match self.cursor {
            None => QuizPhase::NotStarted,
            Some(index) if self.active && index < self.quiz.len() => {
                QuizPhase::QuestionOpen { index }
            }
            Some(_) => QuizPhase::Finished,
        }
    }

    /// Move the cursor one question forward.
    ///
    /// Advancing from [`QuizPhase::Finished`] keeps the machine finished and
    /// reports [`Advance::Finished`] again.
    pub fn advance(&mut self) -> Advance {
        let len = self.quiz.len();
        let next = self.cursor.map_or(0, |cursor| (cursor + 1).min(len));
        self.cursor = Some(next);

        let Some(question) = self.quiz.get(next) else {
            self.active = false;
            info!(question_count = len, "quiz finished");
            return Advance::Finished;
        };

        let opened = OpenedQuestion {
            index: next,
            text: question.text.clone(),
            options: question.options.to_vec(),
        };
        debug!(
            index = next,
            correct_index = question.correct_index,
            "correct answer for the opened question"
        );

        self.reset_answered();
        self.active = true;
        info!(index = next, question_count = len, "question opened");

        Advance::Question(opened)
    }

    /// Install a new question set and return to [`QuizPhase::NotStarted`].
    pub fn load_new_quiz(&mut self, quiz: QuestionSet) -> QuizPhase {
        self.load_quiz_data(quiz);
        info!(
            question_count = self.quiz.len(),
            epoch = self.epoch,
            "quiz loaded"
        );
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::state::quiz::fixtures::question_set;

    #[test]
    fn initial_phase_is_not_started() {
        let session = Session::default();
        assert_eq!(session.phase(), QuizPhase::NotStarted);
    }

    #[test]
    fn exactly_len_advances_reach_finished() {
        for len in [1, 3, 10] {
            let mut session = Session::default();
            session.load_new_quiz(question_set(len));

            for expected in 0..len {
                match session.advance() {
                    Advance::Question(opened) => assert_eq!(opened.index, expected),
                    Advance::Finished => panic!("finished early at {expected} of {len}"),
                }
                assert_eq!(
                    session.phase(),
                    QuizPhase::QuestionOpen { index: expected }
                );
            }

            assert_eq!(session.advance(), Advance::Finished);
            assert_eq!(session.phase(), QuizPhase::Finished);
            assert!(!session.is_active());
        }
    }

    #[test]
    fn advancing_when_finished_is_idempotent() {
        let mut session = Session::default();
        session.load_new_quiz(question_set(2));
        session.advance();
        session.advance();
        assert_eq!(session.advance(), Advance::Finished);

        let cursor = session.cursor();
        for _ in 0..3 {
            assert_eq!(session.advance(), Advance::Finished);
            assert_eq!(session.phase(), QuizPhase::Finished);
        }
        assert_eq!(session.cursor(), cursor);
    }

    #[test]
    fn empty_set_finishes_immediately() {
        let mut session = Session::default();
        assert_eq!(session.advance(), Advance::Finished);
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn opened_question_mirrors_text_and_options() {
        let mut session = Session::default();
        let quiz = question_set(2);
        let first = quiz.get(0).cloned().unwrap();
        session.load_new_quiz(quiz);

        let Advance::Question(opened) = session.advance() else {
            panic!("expected an open question");
        };
        assert_eq!(opened.text, first.text);
        assert_eq!(opened.options, first.options.to_vec());
        assert_eq!(session.current_question(), Some(&first));
    }

    #[test]
    fn advance_resets_answered_flags() {
        let mut session = Session::default();
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());
        session.load_new_quiz(question_set(2));
        session.advance();
        session.record_answer(&id, 2).unwrap();
        assert!(session.participant(&id).unwrap().answered);

        session.advance();
        assert!(!session.participant(&id).unwrap().answered);
        assert!(session.record_answer(&id, 1).unwrap().correct);
    }

    #[test]
    fn loading_returns_to_not_started_from_any_phase() {
        let mut session = Session::default();
        session.load_new_quiz(question_set(1));
        session.advance();
        assert_eq!(
            session.load_new_quiz(question_set(3)),
            QuizPhase::NotStarted
        );

        session.advance();
        session.advance();
        session.advance();
        session.advance();
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(
            session.load_new_quiz(question_set(3)),
            QuizPhase::NotStarted
        );
    }
}
