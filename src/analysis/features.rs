//! Per-frame feature extraction: parallel pitch-class and loudness series.

use tracing::debug;

use crate::types::{AudioData, FeatureSeries, PitchClass};

use super::note::pitch_class;
use super::pitch::{estimate_pitch, rms};
use super::AnalysisConfig;

/// Slices a decoded buffer into fixed-duration frames and derives a pitch
/// class and an RMS volume for each.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract a [`FeatureSeries`] from a full audio buffer.
    ///
    /// Frames are non-overlapping; the final partial frame, if any, is still
    /// analyzed over its available samples. Volumes are normalized to the
    /// buffer's own peak RMS after the full pass, which keeps rhythm
    /// comparison robust to absolute recording loudness.
    pub fn extract(&self, audio: &AudioData) -> FeatureSeries {
        let frame_len = self.frame_length(audio.sample_rate);
        if frame_len == 0 || audio.samples.is_empty() {
            return FeatureSeries::default();
        }

        let mut notes = Vec::new();
        let mut volume = Vec::new();
        let mut peak_rms = 0.0f32;

        for frame in audio.samples.chunks(frame_len) {
            let loudness = rms(frame);
            peak_rms = peak_rms.max(loudness);
            volume.push(loudness);
            notes.push(self.frame_note(frame, audio.sample_rate));
        }

        if peak_rms > 0.0 {
            for value in &mut volume {
                *value /= peak_rms;
            }
        }

        debug!(
            frames = notes.len(),
            voiced = notes.iter().filter(|n| !n.is_silent()).count(),
            peak_rms,
            "extracted feature series"
        );
        FeatureSeries { notes, volume }
    }

    fn frame_note(&self, frame: &[f32], sample_rate: u32) -> PitchClass {
        let estimate = estimate_pitch(frame, sample_rate, &self.config);
        match estimate.frequency {
            Some(frequency) if estimate.confidence > self.config.min_confidence => {
                pitch_class(frequency)
            }
            _ => PitchClass::Silent,
        }
    }

    fn frame_length(&self, sample_rate: u32) -> usize {
        (sample_rate as f32 * self.config.frame_duration).floor() as usize
    }
}
