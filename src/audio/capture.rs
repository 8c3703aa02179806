//! Fixed-duration microphone capture for learner attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig};
use tracing::{info, warn};

use crate::audio::resample;
use crate::types::AudioData;

const DEFAULT_SAMPLE_RATE: u32 = 44_100;
const RECV_TIMEOUT_MS: u64 = 50;

#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub device_name: Option<String>,
    /// Sample rate the recorded attempt is resampled to before analysis.
    pub sample_rate: u32,
    /// How long to record the attempt.
    pub duration: Duration,
}

impl CaptureConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            device_name: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration,
        }
    }
}

/// Record a learner attempt of the configured duration from the microphone.
///
/// The stream runs at the device's native rate and channel count; frames are
/// mixed to mono in the callback and linearly resampled to the configured
/// analysis rate afterwards.
pub fn record_attempt(config: &CaptureConfig) -> Result<AudioData> {
    let device = select_device(config)?;
    info!(
        device = device.name().unwrap_or_else(|_| "<unnamed>".into()),
        duration_secs = config.duration.as_secs_f32(),
        "recording attempt"
    );
    let setup = build_stream(&device)?;
    let frames_needed =
        (config.duration.as_secs_f64() * setup.sample_rate as f64).ceil() as usize;
    let raw = collect_samples(setup.stream, setup.receiver, setup.finished, frames_needed)?;
    let samples = if setup.sample_rate == config.sample_rate {
        raw
    } else {
        resample::linear_resample(&raw, setup.sample_rate, config.sample_rate)?
    };
    Ok(AudioData {
        samples,
        sample_rate: config.sample_rate,
    })
}

struct StreamSetup {
    stream: Stream,
    receiver: Receiver<Vec<f32>>,
    finished: Arc<AtomicBool>,
    sample_rate: u32,
}

fn select_device(config: &CaptureConfig) -> Result<Device> {
    let host = cpal::default_host();
    if let Some(name) = config.device_name.as_deref() {
        for device in host
            .input_devices()
            .context("listing input devices failed")?
        {
            if device.name().map(|n| n == name).unwrap_or(false) {
                return Ok(device);
            }
        }
        return Err(anyhow!("input device '{}' not found", name));
    }
    host.default_input_device()
        .context("no default input device available")
}

fn build_stream(device: &Device) -> Result<StreamSetup> {
    let supported = device
        .default_input_config()
        .context("failed to query default input config")?;
    let stream_config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: BufferSize::Default,
    };
    let (sender, receiver) = mpsc::sync_channel::<Vec<f32>>(64);
    let finished = Arc::new(AtomicBool::new(false));
    let stream = build_input_stream(
        device,
        &stream_config,
        supported.sample_format(),
        sender,
        finished.clone(),
    )?;
    Ok(StreamSetup {
        stream,
        receiver,
        finished,
        sample_rate: stream_config.sample_rate.0,
    })
}

fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    sender: SyncSender<Vec<f32>>,
    finished: Arc<AtomicBool>,
) -> Result<Stream> {
    let err_fn = |err| warn!(error = %err, "audio input stream error");
    let channels = config.channels as usize;
    match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _| emit_mono(data, channels, &sender, &finished),
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _| {
                let converted: Vec<f32> =
                    data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                emit_mono(&converted, channels, &sender, &finished)
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _| {
                let converted: Vec<f32> = data
                    .iter()
                    .map(|&s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0)
                    .collect();
                emit_mono(&converted, channels, &sender, &finished)
            },
            err_fn,
            None,
        ),
        other => return Err(anyhow!("unsupported input sample format {:?}", other)),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to build input stream")
}

fn emit_mono(
    data: &[f32],
    channels: usize,
    sender: &SyncSender<Vec<f32>>,
    finished: &Arc<AtomicBool>,
) {
    if finished.load(Ordering::Relaxed) || channels == 0 {
        return;
    }
    let mut mono = Vec::with_capacity(data.len() / channels);
    for frame in data.chunks(channels) {
        mono.push(mix_to_mono(frame));
    }
    let _ = sender.try_send(mono);
}

fn collect_samples(
    stream: Stream,
    receiver: Receiver<Vec<f32>>,
    finished: Arc<AtomicBool>,
    frames_needed: usize,
) -> Result<Vec<f32>> {
    stream.play().context("failed to start capture stream")?;
    let mut collected = Vec::with_capacity(frames_needed);
    while collected.len() < frames_needed {
        match receiver.recv_timeout(Duration::from_millis(RECV_TIMEOUT_MS)) {
            Ok(chunk) => append_chunk(&mut collected, chunk, frames_needed),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    finished.store(true, Ordering::SeqCst);
    stream.pause().ok();
    Ok(collected)
}

fn append_chunk(buffer: &mut Vec<f32>, mut chunk: Vec<f32>, frames_needed: usize) {
    let remaining = frames_needed.saturating_sub(buffer.len());
    chunk.truncate(remaining);
    buffer.extend_from_slice(&chunk);
}

pub fn mix_to_mono(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().sum::<f32>() / frame.len() as f32
}
