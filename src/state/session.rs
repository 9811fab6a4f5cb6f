//! In-memory registry of participants and the session-wide quiz state.
//!
//! Every method here runs to completion under the session lock held by
//! [`AppState`](super::AppState), which makes each operation atomic with
//! respect to other inbound events.

use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::state::quiz::{Question, QuestionSet};

/// Opaque identifier of a realtime connection, unique for its lifetime.
pub type ConnectionId = Uuid;

/// Points awarded for a correct answer unless configured otherwise.
pub const DEFAULT_POINTS_PER_CORRECT: u32 = 10;

/// Participant tracked while their connection stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name supplied at join (not unique).
    pub name: String,
    /// Cumulative score, reset on every quiz load.
    pub score: u32,
    /// Whether an answer was already recorded for the open question.
    pub answered: bool,
}

impl Participant {
    fn new(name: String) -> Self {
        Self {
            name,
            score: 0,
            answered: false,
        }
    }
}

/// Outcome of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    /// Whether the submitted index matched the correct option.
    pub correct: bool,
    /// Participant's cumulative score after this answer.
    pub score: u32,
}

/// Reasons an answer submission is refused. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnswerRejected {
    /// The connection never joined, or already left.
    #[error("participant is not registered")]
    UnknownParticipant,
    /// One answer per participant per question.
    #[error("participant already answered the current question")]
    AlreadyAnswered,
    /// Before the first question or after the last one.
    #[error("no question is currently open")]
    NoActiveQuestion,
}

/// Name and score pair used by roster and leaderboard projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// Display name.
    pub name: String,
    /// Cumulative score.
    pub score: u32,
}

/// The single live quiz instance shared by all current participants.
#[derive(Debug)]
pub struct Session {
    pub(super) quiz: QuestionSet,
    /// `None` until the first question opens; `Some(len)` once finished.
    pub(super) cursor: Option<usize>,
    pub(super) active: bool,
    pub(super) epoch: u64,
    pub(super) loaded_at: Option<SystemTime>,
    participants: IndexMap<ConnectionId, Participant>,
    points_per_correct: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS_PER_CORRECT)
    }
}

impl Session {
    /// Create an empty, inactive session awarding `points_per_correct` per good answer.
    pub fn new(points_per_correct: u32) -> Self {
        Self {
            quiz: QuestionSet::default(),
            cursor: None,
            active: false,
            epoch: 0,
            loaded_at: None,
            participants: IndexMap::new(),
            points_per_correct,
        }
    }

    /// Register a participant for `conn_id`.
    ///
    /// A second join on the same connection is treated as a fresh join: the
    /// previous name, score and answered flag are replaced, while the roster
    /// position is kept.
    pub fn add_or_update_participant(&mut self, conn_id: ConnectionId, name: String) {
        self.participants.insert(conn_id, Participant::new(name));
    }

    /// Drop the participant bound to `conn_id`, if any.
    pub fn remove_participant(&mut self, conn_id: &ConnectionId) -> Option<Participant> {
        self.participants.shift_remove(conn_id)
    }

    /// Participant bound to `conn_id`, if it joined.
    pub fn participant(&self, conn_id: &ConnectionId) -> Option<&Participant> {
        self.participants.get(conn_id)
    }

    /// Number of joined participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Install a new question set and restart the session epoch.
    ///
    /// The roster is kept; every score and answered flag goes back to zero.
    pub fn load_quiz_data(&mut self, quiz: QuestionSet) {
        self.quiz = quiz;
        self.cursor = None;
        self.active = false;
        self.epoch += 1;
        self.loaded_at = Some(SystemTime::now());
        for participant in self.participants.values_mut() {
            participant.score = 0;
            participant.answered = false;
        }
    }

    /// Question under the cursor, or `None` before the start and after the end.
    pub fn current_question(&self) -> Option<&Question> {
        self.cursor.and_then(|index| self.quiz.get(index))
    }

    /// Size of the installed question set; zero before the first load.
    pub fn question_count(&self) -> usize {
        self.quiz.len()
    }

    /// Raw cursor position. See [`Session::phase`] for its meaning.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether a question currently accepts answers.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of quiz loads since startup.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Wall-clock time of the last quiz load.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.loaded_at
    }

    /// Record the single answer `conn_id` may give for the open question.
    pub fn record_answer(
        &mut self,
        conn_id: &ConnectionId,
        index: i64,
    ) -> Result<ScoreResult, AnswerRejected> {
        let participant = self
            .participants
            .get_mut(conn_id)
            .ok_or(AnswerRejected::UnknownParticipant)?;
        if participant.answered {
            return Err(AnswerRejected::AlreadyAnswered);
        }

        let question = match self.cursor {
            Some(cursor) if self.active => self.quiz.get(cursor),
            _ => None,
        }
        .ok_or(AnswerRejected::NoActiveQuestion)?;

        participant.answered = true;
        let correct = question.is_correct(index);
        if correct {
            participant.score = participant.score.saturating_add(self.points_per_correct);
        }

        Ok(ScoreResult {
            correct,
            score: participant.score,
        })
    }

    /// Clear every participant's answered flag ahead of a new question.
    pub(super) fn reset_answered(&mut self) {
        for participant in self.participants.values_mut() {
            participant.answered = false;
        }
    }

    /// Every participant in join order.
    pub fn roster(&self) -> Vec<Standing> {
        self.participants
            .values()
            .map(|participant| Standing {
                name: participant.name.clone(),
                score: participant.score,
            })
            .collect()
    }

    /// Participants ranked by score, ties kept in join order, truncated to `limit`.
    pub fn leaderboard(&self, limit: usize) -> Vec<Standing> {
        let mut standings = self.roster();
        // `sort_by` is stable, so equal scores keep join order.
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings.truncate(limit);
        standings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::quiz::fixtures::question_set;

    fn open_first_question(session: &mut Session) {
        session.advance();
        assert!(session.is_active());
    }

    #[test]
    fn join_creates_fresh_participant() {
        let mut session = Session::default();
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());

        let participant = session.participant(&id).unwrap();
        assert_eq!(participant.score, 0);
        assert!(!participant.answered);
        assert_eq!(session.participant_count(), 1);
    }

    #[test]
    fn removing_unknown_participant_is_a_noop() {
        let mut session = Session::default();
        assert!(session.remove_participant(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn correct_answer_awards_points_once_per_question() {
        let mut session = Session::default();
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());
        session.load_quiz_data(question_set(3));
        open_first_question(&mut session);

        let result = session.record_answer(&id, 0).unwrap();
        assert_eq!(
            result,
            ScoreResult {
                correct: true,
                score: 10
            }
        );

        let again = session.record_answer(&id, 0);
        assert_eq!(again, Err(AnswerRejected::AlreadyAnswered));
        assert_eq!(session.participant(&id).unwrap().score, 10);
    }

    #[test]
    fn wrong_answer_consumes_the_turn_without_points() {
        let mut session = Session::default();
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());
        session.load_quiz_data(question_set(1));
        open_first_question(&mut session);

        let result = session.record_answer(&id, 3).unwrap();
        assert!(!result.correct);
        assert_eq!(result.score, 0);
        assert!(session.participant(&id).unwrap().answered);
    }

    #[test]
    fn answers_are_rejected_without_open_question() {
        let mut session = Session::default();
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());
        session.load_quiz_data(question_set(1));

        assert_eq!(
            session.record_answer(&id, 0),
            Err(AnswerRejected::NoActiveQuestion)
        );
        assert!(!session.participant(&id).unwrap().answered);

        session.advance();
        session.advance();
        assert_eq!(
            session.record_answer(&id, 0),
            Err(AnswerRejected::NoActiveQuestion)
        );
    }

    #[test]
    fn answers_from_unknown_connections_are_rejected() {
        let mut session = Session::default();
        session.load_quiz_data(question_set(1));
        open_first_question(&mut session);

        assert_eq!(
            session.record_answer(&Uuid::new_v4(), 0),
            Err(AnswerRejected::UnknownParticipant)
        );
    }

    #[test]
    fn custom_award_is_applied() {
        let mut session = Session::new(25);
        let id = Uuid::new_v4();
        session.add_or_update_participant(id, "Ada".into());
        session.load_quiz_data(question_set(1));
        open_first_question(&mut session);

        assert_eq!(session.record_answer(&id, 0).unwrap().score, 25);
    }

    #[test]
    fn loading_a_quiz_resets_scores_but_keeps_roster() {
        let mut session = Session::default();
        let ada = Uuid::new_v4();
        let bob = Uuid::new_v4();
        session.add_or_update_participant(ada, "Ada".into());
        session.add_or_update_participant(bob, "Bob".into());
        session.load_quiz_data(question_set(2));
        open_first_question(&mut session);
        session.record_answer(&ada, 0).unwrap();
        session.record_answer(&bob, 1).unwrap();
        let epoch = session.epoch();

        session.load_quiz_data(question_set(4));

        assert_eq!(session.participant_count(), 2);
        for id in [ada, bob] {
            let participant = session.participant(&id).unwrap();
            assert_eq!(participant.score, 0);
            assert!(!participant.answered);
        }
        assert_eq!(session.cursor(), None);
        assert!(!session.is_active());
        assert_eq!(session.question_count(), 4);
        assert_eq!(session.epoch(), epoch + 1);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn leaderboard_sorts_descending_with_stable_ties_and_truncates() {
        let mut session = Session::default();
        let ids: Vec<_> = (0..5).map(|_| Uuid::new_v4()).collect();
        for (i, id) in ids.iter().enumerate() {
            session.add_or_update_participant(*id, format!("p{i}"));
        }
        session.load_quiz_data(question_set(2));

        // q1 correct index 0, q2 correct index 1
        session.advance();
        for (id, index) in ids.iter().zip([0, 0, 2, 0, 3]) {
            session.record_answer(id, index).unwrap();
        }
        session.advance();
        for (id, index) in ids.iter().zip([0, 1, 0, 1, 1]) {
            session.record_answer(id, index).unwrap();
        }

        let scores: Vec<_> = session
            .leaderboard(10)
            .into_iter()
            .map(|s| (s.name, s.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("p1".to_string(), 20),
                ("p3".to_string(), 20),
                ("p0".to_string(), 10),
                ("p4".to_string(), 10),
                ("p2".to_string(), 0),
            ]
        );

        let top = session.leaderboard(3);
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert!(session.leaderboard(0).is_empty());
    }

    #[test]
    fn rejoining_after_disconnect_starts_from_zero() {
        let mut session = Session::default();
        let first = Uuid::new_v4();
        session.add_or_update_participant(first, "Ada".into());
        session.load_quiz_data(question_set(3));
        open_first_question(&mut session);
        session.record_answer(&first, 0).unwrap();

        session.remove_participant(&first);
        let second = Uuid::new_v4();
        session.add_or_update_participant(second, "Ada".into());

        let participant = session.participant(&second).unwrap();
        assert_eq!(participant.score, 0);
        assert!(!participant.answered);
        assert_eq!(
            session.roster(),
            vec![Standing {
                name: "Ada".into(),
                score: 0
            }]
        );
        assert_eq!(session.record_answer(&second, 0).unwrap().score, 10);
    }
}
