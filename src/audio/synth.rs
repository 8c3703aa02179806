//! Reference melody synthesis.
//!
//! Presence-mode lessons carry only discrete target frequencies; the
//! reference phrase the learner hears is generated from them the way the
//! original oscillator did: one sine tone per note with an exponential gain
//! decay across the phrase.

use std::f32::consts::TAU;

use crate::types::AudioData;

const START_GAIN: f32 = 0.5;
const END_GAIN: f32 = 0.01;

/// Render a sequence of note frequencies into a single mono phrase.
///
/// `note_duration` is per note in seconds (the original uses 0.5 s).
pub fn synthesize_melody(frequencies: &[f32], note_duration: f32, sample_rate: u32) -> AudioData {
    let samples_per_note = (sample_rate as f32 * note_duration).floor() as usize;
    let total = samples_per_note * frequencies.len();
    let mut samples = Vec::with_capacity(total);
    if total == 0 {
        return AudioData::new(samples, sample_rate);
    }
    let decay = (END_GAIN / START_GAIN).powf(1.0 / total as f32);
    let mut gain = START_GAIN;
    for &frequency in frequencies {
        let step = TAU * frequency / sample_rate as f32;
        for i in 0..samples_per_note {
            samples.push((step * i as f32).sin() * gain);
            gain *= decay;
        }
    }
    AudioData::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{pitch_class, AnalysisConfig};
    use crate::analysis::pitch::estimate_pitch;
    use crate::types::PitchClass;

    #[test]
    fn renders_expected_length() {
        let audio = synthesize_melody(&[261.63, 293.66, 329.63], 0.5, 44_100);
        assert_eq!(audio.samples.len(), 22_050 * 3);
        assert_eq!(audio.sample_rate, 44_100);
    }

    #[test]
    fn empty_melody_is_empty_audio() {
        let audio = synthesize_melody(&[], 0.5, 44_100);
        assert!(audio.samples.is_empty());
    }

    #[test]
    fn synthesized_tone_detects_as_its_own_class() {
        let audio = synthesize_melody(&[440.0], 0.2, 44_100);
        let window = &audio.samples[..4096];
        let estimate = estimate_pitch(window, 44_100, &AnalysisConfig::default());
        let frequency = estimate.frequency.expect("synthesized tone is voiced");
        assert_eq!(pitch_class(frequency), PitchClass::Note(9));
    }

    #[test]
    fn gain_decays_over_the_phrase() {
        let audio = synthesize_melody(&[440.0, 440.0], 0.25, 44_100);
        let head_peak = audio.samples[..1000].iter().fold(0.0f32, |a, &s| a.max(s.abs()));
        let tail_peak = audio.samples[audio.samples.len() - 1000..]
            .iter()
            .fold(0.0f32, |a, &s| a.max(s.abs()));
        assert!(head_peak > tail_peak * 2.0);
    }
}
