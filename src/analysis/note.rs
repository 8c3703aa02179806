//! Frequency-to-chroma mapping on the equal-tempered scale.

use crate::types::PitchClass;

/// MIDI note number of the A4 = 440 Hz reference.
const A4_MIDI: i32 = 69;
const A4_HZ: f32 = 440.0;

/// Map a frequency to its octave-invariant pitch class.
///
/// Non-positive frequencies are the "no pitch" sentinel used throughout the
/// pipeline and map to [`PitchClass::Silent`].
pub fn pitch_class(frequency: f32) -> PitchClass {
    if frequency <= 0.0 {
        return PitchClass::Silent;
    }
    let semitones_from_a4 = 12.0 * (frequency / A4_HZ).log2();
    let midi = semitones_from_a4.round() as i32 + A4_MIDI;
    PitchClass::Note(midi.rem_euclid(12) as u8)
}

/// Distance between two pitch classes measured around the 12-point cycle,
/// taking the shorter direction.
pub fn circular_distance(a: u8, b: u8) -> u8 {
    let diff = a.abs_diff(b) % 12;
    diff.min(12 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PitchClass;

    #[test]
    fn maps_reference_notes() {
        // C4, D4, E4: the original lesson's reference melody.
        assert_eq!(pitch_class(261.63), PitchClass::Note(0));
        assert_eq!(pitch_class(293.66), PitchClass::Note(2));
        assert_eq!(pitch_class(329.63), PitchClass::Note(4));
        assert_eq!(pitch_class(440.0), PitchClass::Note(9));
    }

    #[test]
    fn non_positive_frequency_is_silent() {
        assert_eq!(pitch_class(0.0), PitchClass::Silent);
        assert_eq!(pitch_class(-1.0), PitchClass::Silent);
    }

    #[test]
    fn octave_invariance() {
        for &frequency in &[55.0f32, 110.0, 261.63, 440.0, 987.77] {
            assert_eq!(pitch_class(frequency), pitch_class(frequency * 2.0));
            assert_eq!(pitch_class(frequency), pitch_class(frequency / 2.0));
        }
    }

    #[test]
    fn circular_distance_wraps() {
        assert_eq!(circular_distance(0, 11), 1);
        assert_eq!(circular_distance(11, 0), 1);
        assert_eq!(circular_distance(0, 6), 6);
        assert_eq!(circular_distance(3, 3), 0);
        assert_eq!(circular_distance(2, 9), 5);
    }
}
