//! Autocorrelation fundamental-frequency detector.
//!
//! Estimates F0 by finding the lag at which the window most resembles a
//! delayed copy of itself. The search is O(n²) in the window length, which is
//! acceptable for 50 ms frames (a few thousand samples); larger windows would
//! want an FFT-based autocorrelation instead.

use crate::types::PitchEstimate;

use super::AnalysisConfig;

/// Detect the fundamental frequency of one fixed-length sample window.
///
/// Degenerate input (empty window, near-silence, no usable peak) always
/// yields an unvoiced estimate rather than an error: downstream scoring must
/// complete regardless of what the learner recorded.
pub fn estimate_pitch(window: &[f32], sample_rate: u32, config: &AnalysisConfig) -> PitchEstimate {
    if window.is_empty() || sample_rate == 0 {
        return PitchEstimate::unvoiced();
    }
    if rms(window) < config.silence_rms {
        return PitchEstimate::unvoiced();
    }

    let trimmed = trim_edges(window, config.trim_threshold);
    if trimmed.is_empty() {
        return PitchEstimate::unvoiced();
    }

    let correlation = autocorrelate(trimmed);
    match dominant_lag(&correlation) {
        Some(lag) if lag > 0 => {
            let frequency = sample_rate as f32 / lag as f32;
            let confidence = if correlation[0] > 0.0 {
                (correlation[lag] / correlation[0]).clamp(0.0, 1.0)
            } else {
                0.0
            };
            PitchEstimate {
                frequency: Some(frequency),
                confidence,
            }
        }
        _ => PitchEstimate::unvoiced(),
    }
}

/// Root-mean-square loudness of a window.
pub fn rms(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let energy: f32 = window.iter().map(|s| s * s).sum();
    (energy / window.len() as f32).sqrt()
}

/// Restrict the window to `[r1, r2)`, where r1/r2 are the first low-amplitude
/// samples found within the leading/trailing half. Removes DC-offset and
/// onset transients that distort the correlation.
fn trim_edges(window: &[f32], threshold: f32) -> &[f32] {
    let half = window.len() / 2;
    let start = (0..half)
        .find(|&i| window[i].abs() < threshold)
        .unwrap_or(0);
    let end = (1..half)
        .find(|&i| window[window.len() - i].abs() < threshold)
        .map(|i| window.len() - i)
        .unwrap_or(window.len());
    if start >= end {
        return &[];
    }
    &window[start..end]
}

/// Unnormalized autocorrelation: `c[i] = Σ_j buf[j]·buf[j+i]`.
fn autocorrelate(buf: &[f32]) -> Vec<f32> {
    let len = buf.len();
    let mut correlation = vec![0.0f32; len];
    for (lag, value) in correlation.iter_mut().enumerate() {
        let mut sum = 0.0;
        for j in 0..len - lag {
            sum += buf[j] * buf[j + lag];
        }
        *value = sum;
    }
    correlation
}

/// Find the lag with the highest correlation after skipping the initial
/// monotonically-decreasing region (the trivial zero-lag peak and its
/// descent).
fn dominant_lag(correlation: &[f32]) -> Option<usize> {
    if correlation.is_empty() {
        return None;
    }
    let mut descent_end = 0;
    while descent_end + 1 < correlation.len()
        && correlation[descent_end] > correlation[descent_end + 1]
    {
        descent_end += 1;
    }
    (descent_end..correlation.len()).max_by(|&a, &b| {
        correlation[a]
            .partial_cmp(&correlation[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    const SAMPLE_RATE: u32 = 44_100;

    fn sine(frequency: f32, amplitude: f32, samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|i| (TAU * frequency * i as f32 / SAMPLE_RATE as f32).sin() * amplitude)
            .collect()
    }

    #[test]
    fn silence_yields_unvoiced_estimate() {
        let window = vec![0.0f32; 2048];
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &AnalysisConfig::default());
        assert_eq!(estimate.frequency, None);
        assert_eq!(estimate.confidence, 0.0);
    }

    #[test]
    fn empty_window_does_not_panic() {
        let estimate = estimate_pitch(&[], SAMPLE_RATE, &AnalysisConfig::default());
        assert_eq!(estimate.frequency, None);
    }

    #[test]
    fn quiet_signal_below_gate_is_unvoiced() {
        let window = sine(440.0, 0.005, 2048);
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &AnalysisConfig::default());
        assert_eq!(estimate.frequency, None);
    }

    #[test]
    fn detects_a4_within_a_semitone() {
        let window = sine(440.0, 0.6, 4096);
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &AnalysisConfig::default());
        let frequency = estimate.frequency.expect("loud sine should be voiced");
        // One autocorrelation lag of slack at 44.1 kHz around 440 Hz.
        assert!(
            (frequency - 440.0).abs() < 10.0,
            "detected {frequency} Hz instead of ~440 Hz"
        );
        assert!(estimate.confidence > 0.6);
    }

    #[test]
    fn detects_c4() {
        let window = sine(261.63, 0.6, 4096);
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &AnalysisConfig::default());
        let frequency = estimate.frequency.expect("loud sine should be voiced");
        assert!((frequency - 261.63).abs() < 6.0);
    }

    #[test]
    fn rms_of_constant_signal() {
        let window = vec![0.5f32; 128];
        assert!((rms(&window) - 0.5).abs() < 1e-6);
    }
}
