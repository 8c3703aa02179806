//! Practice-session orchestration: play the reference, record the attempt,
//! settle the transcript oracle, score.
//!
//! The analysis core is pure; everything stateful or time-dependent lives
//! here. In particular, speech recognition is an asynchronous external
//! oracle that may still deliver updates after recording stops, so the
//! session imposes a fixed settling delay before reading the final
//! transcript and treats whatever is latest at that deadline as
//! authoritative.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::FeatureExtractor;
use crate::audio::capture::{record_attempt, CaptureConfig};
use crate::audio::{decoder, encoder, playback, synth};
use crate::lesson::LessonStep;
use crate::scoring::{LessonScorer, ScoreResult};
use crate::types::AudioData;

/// How long to wait after recording stops before reading the transcript.
pub const TRANSCRIPT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Source of the learner transcript.
///
/// `latest` is read once, after the settling deadline. There is no
/// cancellation: whatever the oracle holds at that point is authoritative,
/// and later updates are ignored.
pub trait TranscriptOracle {
    fn latest(&self) -> Option<String>;
}

/// Transcript supplied up front (e.g., typed on the command line).
pub struct StaticTranscript(pub Option<String>);

impl TranscriptOracle for StaticTranscript {
    fn latest(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Transcript file an external recognizer keeps overwriting; whatever the
/// file holds at the deadline wins.
pub struct FileTranscript(pub PathBuf);

impl TranscriptOracle for FileTranscript {
    fn latest(&self) -> Option<String> {
        match fs::read_to_string(&self.0) {
            Ok(text) => Some(text.trim().to_string()),
            Err(err) => {
                warn!(path = %self.0.display(), error = %err, "transcript file unreadable");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capture: CaptureConfig,
    /// Where to save the recorded attempt for later review, if anywhere.
    pub save_attempt: Option<PathBuf>,
    /// Skip reference playback (useful without an output device).
    pub skip_playback: bool,
}

impl SessionConfig {
    pub fn new(capture: CaptureConfig) -> Self {
        Self {
            capture,
            save_attempt: None,
            skip_playback: false,
        }
    }
}

/// Run one practice pass over a lesson step and return its score.
pub fn run_step(
    step: &LessonStep,
    config: &SessionConfig,
    oracle: &dyn TranscriptOracle,
) -> Result<ScoreResult> {
    let reference = load_reference(step, config.capture.sample_rate)?;

    if !config.skip_playback {
        info!("playing reference phrase");
        playback::play_reference(&reference)
            .context("failed to play reference phrase")?;
    }

    let attempt = record_attempt(&config.capture).context("failed to record attempt")?;
    if let Some(path) = &config.save_attempt {
        encoder::encode_audio(&attempt, path)
            .with_context(|| format!("failed to save attempt to {}", path.display()))?;
        info!(path = %path.display(), "saved attempt recording");
    }

    info!(
        delay_ms = TRANSCRIPT_SETTLE_DELAY.as_millis() as u64,
        "waiting for transcript oracle to settle"
    );
    thread::sleep(TRANSCRIPT_SETTLE_DELAY);
    let transcript = oracle.latest().unwrap_or_default();

    score_attempt(step, &reference, &attempt, &transcript)
}

/// Score an already-recorded attempt against a step's reference. Pure over
/// its inputs; `run_step` calls this after the settling deadline, and the
/// offline CLI path calls it directly.
pub fn score_attempt(
    step: &LessonStep,
    reference: &AudioData,
    attempt: &AudioData,
    transcript: &str,
) -> Result<ScoreResult> {
    let extractor = FeatureExtractor::new();
    let scorer = LessonScorer::new();
    let user_features = extractor.extract(attempt);

    if step.is_presence_only() {
        return Ok(scorer.score_presence(&user_features.notes, &step.target_frequencies));
    }

    let target_features = extractor.extract(reference);
    let target_text = step.expected_transcript.as_deref().unwrap_or("");
    scorer
        .score_lesson(&user_features, &target_features, transcript, target_text)
        .context("failed to score attempt")
}

/// Resolve a step's reference audio: decode its file, or synthesize the
/// phrase from its target frequencies.
pub fn load_reference(step: &LessonStep, sample_rate: u32) -> Result<AudioData> {
    match &step.file {
        Some(path) => decode_reference(path),
        None => Ok(synth::synthesize_melody(
            &step.target_frequencies,
            step.note_duration(),
            sample_rate,
        )),
    }
}

fn decode_reference(path: &Path) -> Result<AudioData> {
    let audio = decoder::decode_audio(path)
        .with_context(|| format!("failed to decode reference {}", path.display()))?;
    info!(
        path = %path.display(),
        duration_secs = audio.duration_secs(),
        "loaded reference phrase"
    );
    Ok(audio)
}
