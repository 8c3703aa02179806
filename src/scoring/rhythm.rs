//! Frame-aligned binary-onset comparison of two volume envelopes.

use super::ScoringConfig;

/// Percentage of frames, over the shared prefix, where both envelopes agree
/// on being "on" (above the onset threshold) or "off".
///
/// This is deliberately a coarse onset-alignment proxy, not beat tracking:
/// tempo differences are not time-warped, and a trailing length mismatch is
/// simply ignored. Zero overlap yields 0.
pub fn rhythm_similarity(user: &[f32], target: &[f32], config: &ScoringConfig) -> f32 {
    let overlap = user.len().min(target.len());
    if overlap == 0 {
        return 0.0;
    }
    let matches = user
        .iter()
        .zip(target.iter())
        .filter(|(u, t)| is_on(**u, config) == is_on(**t, config))
        .count();
    matches as f32 / overlap as f32 * 100.0
}

fn is_on(volume: f32, config: &ScoringConfig) -> bool {
    volume > config.onset_threshold
}
