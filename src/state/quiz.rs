//! Strictly-typed quiz content installed in the live session.

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question. Immutable once part of a [`QuestionSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Identifier supplied by the generator (kept verbatim for diagnostics).
    pub id: String,
    /// Question text shown to participants.
    pub text: String,
    /// Answer options; the position of an option is its answer index.
    pub options: [String; OPTION_COUNT],
    /// Index of the correct option, always within `0..OPTION_COUNT`.
    pub correct_index: u8,
}

impl Question {
    /// Compare a submitted option index against the correct one.
    pub fn is_correct(&self, index: i64) -> bool {
        index == i64::from(self.correct_index)
    }
}

/// Ordered collection of questions traversed by the session cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Wrap already validated questions, keeping their order.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True for the placeholder set installed before the first load.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at cursor position `index`.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Questions in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
