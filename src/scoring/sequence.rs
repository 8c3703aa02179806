//! Weighted edit distance between compressed melody sequences.

use ndarray::Array2;

use crate::analysis::circular_distance;

use super::ScoringConfig;

/// Similarity percentage in [0, 100] between two melody sequences.
///
/// Levenshtein with a pitch-aware substitution cost: swapping a note for an
/// adjacent semitone (circular distance ≤ 1) is a near-miss and costs
/// `near_miss_cost` instead of a full unit. Insertions and deletions always
/// cost 1. Either sequence being empty contributes nothing to the melody
/// axis.
pub fn melody_similarity(user: &[u8], target: &[u8], config: &ScoringConfig) -> f32 {
    if user.is_empty() || target.is_empty() {
        return 0.0;
    }
    let distance = weighted_edit_distance(user, target, config);
    let span = user.len().max(target.len()) as f32;
    ((1.0 - distance / span) * 100.0).clamp(0.0, 100.0)
}

fn weighted_edit_distance(user: &[u8], target: &[u8], config: &ScoringConfig) -> f32 {
    let rows = target.len() + 1;
    let cols = user.len() + 1;
    let mut table = Array2::<f32>::zeros((rows, cols));
    for i in 1..rows {
        table[[i, 0]] = i as f32;
    }
    for j in 1..cols {
        table[[0, j]] = j as f32;
    }
    for i in 1..rows {
        for j in 1..cols {
            let substitution =
                table[[i - 1, j - 1]] + substitution_cost(target[i - 1], user[j - 1], config);
            let deletion = table[[i - 1, j]] + 1.0;
            let insertion = table[[i, j - 1]] + 1.0;
            table[[i, j]] = substitution.min(deletion).min(insertion);
        }
    }
    table[[rows - 1, cols - 1]]
}

fn substitution_cost(a: u8, b: u8, config: &ScoringConfig) -> f32 {
    match circular_distance(a, b) {
        0 => 0.0,
        1 => config.near_miss_cost,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(user: &[u8], target: &[u8]) -> f32 {
        melody_similarity(user, target, &ScoringConfig::default())
    }

    #[test]
    fn identical_sequences_score_exactly_100() {
        assert_eq!(score(&[0, 2, 4], &[0, 2, 4]), 100.0);
        assert_eq!(score(&[7], &[7]), 100.0);
    }

    #[test]
    fn empty_sequence_scores_zero() {
        assert_eq!(score(&[], &[0, 2]), 0.0);
        assert_eq!(score(&[0, 2], &[]), 0.0);
        assert_eq!(score(&[], &[]), 0.0);
    }

    #[test]
    fn near_miss_is_cheaper_than_full_substitution() {
        // One semitone off vs a tritone off.
        let near = score(&[0, 2, 5], &[0, 2, 4]);
        let far = score(&[0, 2, 10], &[0, 2, 4]);
        assert!(near > far);
        assert!((near - (1.0 - 0.5 / 3.0) * 100.0).abs() < 1e-4);
    }

    #[test]
    fn substitution_distance_wraps_the_circle() {
        // Classes 0 and 11 are adjacent around the cycle.
        let wrapped = score(&[11], &[0]);
        assert!((wrapped - 50.0).abs() < 1e-4);
    }

    #[test]
    fn stays_within_bounds_for_arbitrary_sequences() {
        let cases: [(&[u8], &[u8]); 4] = [
            (&[0, 1, 2, 3, 4, 5], &[11, 10, 9]),
            (&[6], &[0, 0, 0, 0, 0, 0, 0, 0]),
            (&[3, 3, 3], &[3]),
            (&[0, 4, 7, 0, 4, 7], &[2, 5, 9]),
        ];
        for (user, target) in cases {
            let value = score(user, target);
            assert!((0.0..=100.0).contains(&value), "score {value} out of range");
        }
    }

    #[test]
    fn missing_note_costs_one_indel() {
        let value = score(&[0, 4], &[0, 2, 4]);
        assert!((value - (1.0 - 1.0 / 3.0) * 100.0).abs() < 1e-4);
    }
}
