//! Final lesson scoring: combines melody, rhythm, and word axes.

use tracing::info;

use crate::analysis::{circular_distance, compress_melody, pitch_class};
use crate::types::{FeatureSeries, PitchClass};

use super::{
    match_words, melody_similarity, rhythm_similarity, Feedback, Result, ScoreError, ScoreResult,
    ScoringConfig,
};

/// Orchestrates the scoring axes into one [`ScoreResult`].
///
/// Stateless over its inputs; the caller owns session state and supplies
/// already-finalized data (a settled transcript, a completed recording).
#[derive(Debug, Clone, Default)]
pub struct LessonScorer {
    config: ScoringConfig,
}

impl LessonScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Full comparison mode: melody contour, rhythm envelope, and transcript
    /// words against a full reference [`FeatureSeries`].
    ///
    /// The only hard failure is an attempt with no audio frames at all; that
    /// is a caller precondition violation, distinct from silence *within*
    /// supplied audio, which simply scores low.
    pub fn score_lesson(
        &self,
        user: &FeatureSeries,
        target: &FeatureSeries,
        user_text: &str,
        target_text: &str,
    ) -> Result<ScoreResult> {
        if user.is_empty() {
            return Err(ScoreError::new("no learner audio supplied to score"));
        }

        let user_melody = compress_melody(&user.notes);
        let target_melody = compress_melody(&target.notes);
        let note_score = melody_similarity(&user_melody, &target_melody, &self.config);
        let rhythm_score = rhythm_similarity(&user.volume, &target.volume, &self.config);
        let (text_score, word_matches) = self.text_score(user_text, target_text);

        let blended = self.config.note_weight * note_score
            + self.config.rhythm_weight * rhythm_score
            + self.config.text_weight * text_score;
        let score = blended.round().clamp(0.0, 100.0) as u8;

        let feedback = if f32::from(score) > 80.0 {
            Feedback::Excellent
        } else if text_score < self.config.weak_text_threshold {
            Feedback::WordsNotRecognized
        } else {
            Feedback::NeedsPractice
        };

        info!(
            note_score,
            rhythm_score, text_score, score, "scored full-comparison lesson"
        );
        Ok(ScoreResult {
            score,
            feedback,
            word_matches,
        })
    }

    /// Melody-presence mode: the lenient "did the learner hit the right
    /// notes at all" check used when only discrete target frequencies exist.
    ///
    /// Target classes are collapsed to a set; a target counts as hit when any
    /// detected user class lands within the circular tolerance. Any non-zero
    /// accuracy earns a flat encouragement bonus before clamping.
    pub fn score_presence(
        &self,
        user_notes: &[PitchClass],
        target_frequencies: &[f32],
    ) -> ScoreResult {
        let target_classes = unique_classes(target_frequencies);
        let user_classes: Vec<u8> = user_notes.iter().filter_map(|n| n.note()).collect();

        if user_classes.is_empty() {
            return ScoreResult {
                score: 0,
                feedback: Feedback::Unheard,
                word_matches: Vec::new(),
            };
        }
        if target_classes.is_empty() {
            return ScoreResult {
                score: 0,
                feedback: Feedback::SingClearer,
                word_matches: Vec::new(),
            };
        }

        let hits = target_classes
            .iter()
            .filter(|&&target| {
                user_classes
                    .iter()
                    .any(|&user| circular_distance(user, target) <= self.config.presence_tolerance)
            })
            .count();

        let mut accuracy = hits as f32 / target_classes.len() as f32 * 100.0;
        if accuracy > 0.0 {
            accuracy += self.config.presence_bonus;
        }
        let score = accuracy.round().clamp(0.0, 100.0) as u8;

        let feedback = if accuracy > 80.0 {
            Feedback::Excellent
        } else if accuracy > 50.0 {
            Feedback::PartialNotes
        } else {
            Feedback::SingClearer
        };

        info!(hits, targets = target_classes.len(), score, "scored presence lesson");
        ScoreResult {
            score,
            feedback,
            word_matches: Vec::new(),
        }
    }

    fn text_score(&self, user_text: &str, target_text: &str) -> (f32, Vec<bool>) {
        let target_words: Vec<&str> = target_text.split_whitespace().collect();
        if target_words.is_empty() {
            return (100.0, Vec::new());
        }
        let user_lower = user_text.to_lowercase();
        let target_lower = target_text.to_lowercase();
        let user_words: Vec<&str> = user_lower.split_whitespace().collect();
        let target_words_lower: Vec<&str> = target_lower.split_whitespace().collect();
        let word_matches = match_words(&user_words, &target_words_lower);
        let matched = word_matches.iter().filter(|&&m| m).count();
        let score = matched as f32 / target_words_lower.len() as f32 * 100.0;
        (score, word_matches)
    }
}

/// Target pitch classes with duplicates collapsed, in first-seen order.
fn unique_classes(frequencies: &[f32]) -> Vec<u8> {
    let mut classes = Vec::new();
    for &frequency in frequencies {
        if let Some(class) = pitch_class(frequency).note() {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
    }
    classes
}
