//! Similarity scoring between a learner's attempt and the lesson reference:
//! melody edit distance, rhythm correlation, fuzzy word matching, and the
//! weighted final score.

pub mod lesson;
pub mod rhythm;
pub mod sequence;
pub mod words;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::Serialize;

pub use lesson::LessonScorer;
pub use rhythm::rhythm_similarity;
pub use sequence::melody_similarity;
pub use words::{match_words, words_match};

/// Convenient alias for results returned by scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Lightweight error type for the scoring pipeline.
///
/// Almost nothing in scoring is fatal; degenerate input degrades to a zero
/// contribution instead. The one real failure is being asked to score an
/// attempt with no audio supplied at all.
#[derive(Debug, Clone)]
pub struct ScoreError {
    message: Arc<str>,
}

impl ScoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ScoreError {}

/// Weights and thresholds for combining the three scoring axes.
///
/// Tuned by ear in the original lessons; kept overridable so tests can probe
/// around each threshold.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Weight of the melodic-contour score in the final blend.
    pub note_weight: f32,
    /// Weight of the rhythm score in the final blend.
    pub rhythm_weight: f32,
    /// Weight of the transcript word score in the final blend.
    pub text_weight: f32,
    /// Normalized volume above this counts as an "on" frame for rhythm.
    pub onset_threshold: f32,
    /// Substitution cost for adjacent-semitone near-misses.
    pub near_miss_cost: f32,
    /// Circular pitch distance treated as a hit in presence mode.
    pub presence_tolerance: u8,
    /// Flat encouragement bonus added to any non-zero presence accuracy.
    pub presence_bonus: f32,
    /// Full-mode word score below this selects the "words not recognized"
    /// feedback tier.
    pub weak_text_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            note_weight: 0.3,
            rhythm_weight: 0.3,
            text_weight: 0.4,
            onset_threshold: 0.1,
            near_miss_cost: 0.5,
            presence_tolerance: 1,
            presence_bonus: 10.0,
            weak_text_threshold: 40.0,
        }
    }
}

/// Closed set of feedback messages shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Top tier: everything matched.
    Excellent,
    /// Presence mode: some of the target notes were hit.
    PartialNotes,
    /// Presence mode: low accuracy, sing the melody more clearly.
    SingClearer,
    /// Presence mode: no voiced input was detected at all.
    Unheard,
    /// Full mode: the transcript barely matched the target words.
    WordsNotRecognized,
    /// Full mode: middling result.
    NeedsPractice,
}

impl Feedback {
    /// Learner-facing message, kept verbatim from the original lessons.
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Отлично! Все ноты найдены!",
            Feedback::PartialNotes => "Вы попали в часть нот.",
            Feedback::SingClearer => "Попробуйте пропеть мелодию четче.",
            Feedback::Unheard => "Голос не услышан.",
            Feedback::WordsNotRecognized => "Слова не распознаны. Попробуйте произнести их четче.",
            Feedback::NeedsPractice => "Неплохо! Продолжайте тренироваться.",
        }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Terminal output of a scoring pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    /// Final score, always clamped to 0..=100.
    pub score: u8,
    pub feedback: Feedback,
    /// Per-word match flags aligned positionally to the target word list.
    /// Drives transcript highlighting in whatever presentation layer the
    /// caller has.
    pub word_matches: Vec<bool>,
}
