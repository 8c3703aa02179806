//! Decoding reference and attempt files to raw mono PCM via symphonia.

use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::debug;

use crate::types::AudioData;

/// Decode an audio file (WAV, MP3, OGG, FLAC, ...) to mono f32 samples.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open audio file {}", path.display()))?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("failed to probe audio format")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("no audio tracks found in file")?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("sample rate not specified in audio file")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("failed to create decoder")?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(err).context("failed to read packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .context("failed to decode audio packet")?;
        downmix_into(&decoded, &mut samples);
    }

    debug!(
        path = %path.display(),
        sample_rate,
        samples = samples.len(),
        "decoded audio file"
    );
    Ok(AudioData {
        samples,
        sample_rate,
    })
}

/// Downmix any symphonia buffer format to mono f32 in [-1.0, 1.0].
fn downmix_into(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::U8(buf) => downmix_planes(buf, output),
        AudioBufferRef::U16(buf) => downmix_planes(buf, output),
        AudioBufferRef::U24(buf) => downmix_planes(buf, output),
        AudioBufferRef::U32(buf) => downmix_planes(buf, output),
        AudioBufferRef::S8(buf) => downmix_planes(buf, output),
        AudioBufferRef::S16(buf) => downmix_planes(buf, output),
        AudioBufferRef::S24(buf) => downmix_planes(buf, output),
        AudioBufferRef::S32(buf) => downmix_planes(buf, output),
        AudioBufferRef::F32(buf) => downmix_planes(buf, output),
        AudioBufferRef::F64(buf) => downmix_planes(buf, output),
    }
}

fn downmix_planes<S>(buffer: &symphonia::core::audio::AudioBuffer<S>, output: &mut Vec<f32>)
where
    S: Sample + IntoSample<f32>,
{
    let channels = buffer.spec().channels.count();
    let frames = buffer.frames();
    output.reserve(frames);
    if channels == 1 {
        output.extend(buffer.chan(0).iter().map(|&s| IntoSample::<f32>::into_sample(s)));
        return;
    }
    for frame in 0..frames {
        let mut sum = 0.0f32;
        for channel in 0..channels {
            sum += IntoSample::<f32>::into_sample(buffer.chan(channel)[frame]);
        }
        output.push(sum / channels as f32);
    }
}
