//! Melodic-contour compression: reduce a frame-rate pitch trace to the
//! sequence of distinct notes sung, discarding duration and silence.

use crate::types::PitchClass;

/// Collapse a per-frame pitch-class series into its essential note-change
/// shape.
///
/// Silent frames are dropped outright: they neither emit a symbol nor break a
/// run, so a note held across a breath still compresses to one entry. The
/// result is independent of tempo and duration jitter, and the operation is
/// idempotent.
pub fn compress_melody(notes: &[PitchClass]) -> Vec<u8> {
    let mut compressed = Vec::new();
    for note in notes {
        let Some(class) = note.note() else {
            continue;
        };
        if compressed.last() != Some(&class) {
            compressed.push(class);
        }
    }
    compressed
}
