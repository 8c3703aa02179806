//! Saving recorded attempts as 16-bit mono WAV for later review.

use std::path::Path;

use anyhow::{Context, Result};

use crate::types::AudioData;

pub fn encode_audio<P: AsRef<Path>>(audio: &AudioData, path: P) -> Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create WAV file {}", path.display()))?;
    for &sample in &audio.samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .context("failed to write audio sample")?;
    }
    writer.finalize().context("failed to finalize WAV file")?;
    Ok(())
}
