use std::f32::consts::TAU;

use approx::assert_relative_eq;
use singalyzer::analysis::{compress_melody, pitch_class, AnalysisConfig, FeatureExtractor};
use singalyzer::analysis::pitch::estimate_pitch;
use singalyzer::types::{AudioData, PitchClass};

const SAMPLE_RATE: u32 = 44_100;

fn sine(frequency: f32, amplitude: f32, seconds: f32) -> Vec<f32> {
    let count = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..count)
        .map(|i| (TAU * frequency * i as f32 / SAMPLE_RATE as f32).sin() * amplitude)
        .collect()
}

#[test]
fn pure_silence_is_unvoiced_with_zero_confidence() {
    let config = AnalysisConfig::default();
    for len in [0usize, 1, 512, 2048] {
        let window = vec![0.0f32; len];
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &config);
        assert_eq!(estimate.frequency, None, "window of {len} zeros");
        assert_eq!(estimate.confidence, 0.0);
    }
}

#[test]
fn silence_gate_threshold_is_overridable() {
    // The same quiet tone flips from unvoiced to voiced when the gate drops.
    let window = sine(440.0, 0.012, 0.1);
    let strict = AnalysisConfig::default();
    assert_eq!(estimate_pitch(&window, SAMPLE_RATE, &strict).frequency, None);

    let lenient = AnalysisConfig {
        silence_rms: 0.001,
        ..AnalysisConfig::default()
    };
    assert!(estimate_pitch(&window, SAMPLE_RATE, &lenient)
        .frequency
        .is_some());
}

#[test]
fn pitch_class_is_octave_invariant_across_range() {
    let mut frequency = 55.0f32;
    let base = pitch_class(frequency);
    while frequency < 7_000.0 {
        frequency *= 2.0;
        assert_eq!(pitch_class(frequency), base);
    }
}

#[test]
fn detected_sine_lands_on_the_right_class() {
    let config = AnalysisConfig::default();
    // (frequency, expected chroma): C4, D4, E4, A4.
    let cases = [(261.63f32, 0u8), (293.66, 2), (329.63, 4), (440.0, 9)];
    for (frequency, expected) in cases {
        let window = sine(frequency, 0.6, 0.1);
        let estimate = estimate_pitch(&window, SAMPLE_RATE, &config);
        let detected = estimate.frequency.expect("voiced tone");
        assert_eq!(
            pitch_class(detected),
            PitchClass::Note(expected),
            "{frequency} Hz"
        );
    }
}

#[test]
fn feature_series_keeps_notes_and_volume_parallel() {
    let extractor = FeatureExtractor::new();
    for seconds in [0.04f32, 0.05, 0.23, 1.0] {
        let audio = AudioData::new(sine(330.0, 0.5, seconds), SAMPLE_RATE);
        let series = extractor.extract(&audio);
        assert_eq!(series.notes.len(), series.volume.len());
    }
}

#[test]
fn final_partial_frame_is_still_processed() {
    let extractor = FeatureExtractor::new();
    // 0.27 s = 5 full 50 ms frames plus a 20 ms remainder.
    let audio = AudioData::new(sine(330.0, 0.5, 0.27), SAMPLE_RATE);
    let series = extractor.extract(&audio);
    assert_eq!(series.len(), 6);
}

#[test]
fn volume_peak_normalizes_to_one() {
    let extractor = FeatureExtractor::new();
    for amplitude in [0.05f32, 0.3, 0.9] {
        let audio = AudioData::new(sine(261.63, amplitude, 0.4), SAMPLE_RATE);
        let series = extractor.extract(&audio);
        let peak = series.volume.iter().cloned().fold(0.0f32, f32::max);
        assert_relative_eq!(peak, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn compress_melody_is_idempotent() {
    use PitchClass::{Note, Silent};
    let series = [
        Note(0),
        Note(0),
        Silent,
        Note(0),
        Note(2),
        Note(2),
        Silent,
        Note(4),
        Note(4),
        Note(2),
    ];
    let once = compress_melody(&series);
    assert_eq!(once, vec![0, 2, 4, 2]);
    let reinterpreted: Vec<PitchClass> = once.iter().map(|&c| Note(c)).collect();
    assert_eq!(compress_melody(&reinterpreted), once);
}

#[test]
fn sung_scale_compresses_to_its_notes() {
    // Three held tones with breaths between them.
    let mut samples = sine(261.63, 0.6, 0.4);
    samples.extend(vec![0.0; 2_205]);
    samples.extend(sine(293.66, 0.6, 0.4));
    samples.extend(vec![0.0; 2_205]);
    samples.extend(sine(329.63, 0.6, 0.4));
    let audio = AudioData::new(samples, SAMPLE_RATE);

    let series = FeatureExtractor::new().extract(&audio);
    assert_eq!(compress_melody(&series.notes), vec![0, 2, 4]);
}
