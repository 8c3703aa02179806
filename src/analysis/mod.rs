//! Offline audio-to-symbol analysis: pitch detection, chroma mapping,
//! per-frame feature extraction, and melodic-contour compression.

pub mod features;
pub mod melody;
pub mod note;
pub mod pitch;

pub use features::FeatureExtractor;
pub use melody::compress_melody;
pub use note::{circular_distance, pitch_class};
pub use pitch::estimate_pitch;

/// Empirically tuned analysis thresholds.
///
/// These were chosen by ear against real lesson recordings; tests probe
/// behavior at and around each one, so they stay overridable rather than
/// being inlined.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    /// Frame duration in seconds for feature extraction.
    pub frame_duration: f32,
    /// RMS below this is treated as silence; no pitch search is attempted.
    pub silence_rms: f32,
    /// Absolute-amplitude threshold for trimming window edges before
    /// autocorrelation.
    pub trim_threshold: f32,
    /// Minimum autocorrelation confidence for a frame's pitch to count.
    pub min_confidence: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_duration: 0.05,
            silence_rms: 0.01,
            trim_threshold: 0.2,
            min_confidence: 0.6,
        }
    }
}
