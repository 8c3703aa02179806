//! Reference playback through the default output device.

use anyhow::{Context, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

use crate::types::AudioData;

/// Play a reference phrase and block until it finishes.
///
/// References reach this point as mono in-memory buffers, whether decoded
/// from a lesson file or synthesized from target frequencies. Each sample is
/// interleaved into both output channels so playback does not depend on the
/// device's channel layout.
pub fn play_reference(audio: &AudioData) -> Result<()> {
    let (_stream, handle) = OutputStream::try_default().context("failed to open output stream")?;
    let sink = Sink::try_new(&handle).context("failed to create playback sink")?;
    let frames = interleave_stereo(&audio.samples);
    sink.append(SamplesBuffer::new(2, audio.sample_rate, frames));
    sink.sleep_until_end();
    Ok(())
}

fn interleave_stereo(samples: &[f32]) -> Vec<f32> {
    let mut frames = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        frames.extend_from_slice(&[sample, sample]);
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::interleave_stereo;

    #[test]
    fn mono_reference_fills_both_channels() {
        assert_eq!(
            interleave_stereo(&[0.25, -0.5, 1.0]),
            vec![0.25, 0.25, -0.5, -0.5, 1.0, 1.0]
        );
        assert!(interleave_stereo(&[]).is_empty());
    }
}
