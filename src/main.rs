//! singalyzer CLI: practice lessons interactively, score recorded attempts
//! offline, or inspect what the analyzer hears in a file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use singalyzer::analysis::{compress_melody, FeatureExtractor};
use singalyzer::audio::capture::CaptureConfig;
use singalyzer::audio::decoder;
use singalyzer::lesson::Lesson;
use singalyzer::scoring::ScoreResult;
use singalyzer::session::{
    self, FileTranscript, SessionConfig, StaticTranscript, TranscriptOracle,
};
use singalyzer::types::PitchClass;

#[derive(Parser, Debug)]
#[command(name = "singalyzer")]
#[command(about = "Singing and pronunciation practice trainer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a lesson step's reference, record an attempt, and score it.
    Practice(PracticeArgs),
    /// Score a pre-recorded attempt against a reference, without audio I/O.
    Score(ScoreArgs),
    /// Print the detected pitch classes and compressed melody of a file.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct PracticeArgs {
    /// Lesson JSON file.
    #[arg(long)]
    lesson: PathBuf,
    /// Step index within the lesson.
    #[arg(long, default_value_t = 0)]
    step: usize,
    /// How many seconds to record the attempt.
    #[arg(long, default_value_t = 5.0)]
    record_secs: f32,
    /// Optional input device name.
    #[arg(long)]
    device: Option<String>,
    /// Sample rate attempts are resampled to before analysis.
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,
    /// Save the recorded attempt to this WAV file.
    #[arg(long)]
    save_attempt: Option<PathBuf>,
    /// Skip reference playback.
    #[arg(long)]
    no_playback: bool,
    /// Transcript of the attempt, if recognition ran elsewhere.
    #[arg(long, conflicts_with = "transcript_file")]
    transcript: Option<String>,
    /// File an external recognizer writes the transcript to; read once after
    /// the settling delay.
    #[arg(long, conflicts_with = "transcript")]
    transcript_file: Option<PathBuf>,
    /// Emit the result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Lesson JSON file.
    #[arg(long)]
    lesson: PathBuf,
    /// Step index within the lesson.
    #[arg(long, default_value_t = 0)]
    step: usize,
    /// Recorded attempt audio file.
    #[arg(long)]
    attempt: PathBuf,
    /// Transcript of the attempt.
    #[arg(long, default_value = "")]
    transcript: String,
    /// Emit the result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Audio file to analyze.
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Practice(args) => handle_practice(&args),
        Command::Score(args) => handle_score(&args),
        Command::Analyze(args) => handle_analyze(&args),
    }
}

fn handle_practice(args: &PracticeArgs) -> Result<()> {
    let lesson = Lesson::load(&args.lesson)?;
    let step = lesson.step(args.step)?;
    if !step.text.is_empty() {
        println!("Текст: {}", step.text);
        if let Some(translation) = &step.translation {
            println!("Перевод: {}", translation);
        }
    }

    let mut capture = CaptureConfig::new(Duration::from_secs_f32(args.record_secs));
    capture.device_name = args.device.clone();
    capture.sample_rate = args.sample_rate;
    let mut config = SessionConfig::new(capture);
    config.save_attempt = args.save_attempt.clone();
    config.skip_playback = args.no_playback;

    let oracle: Box<dyn TranscriptOracle> = match &args.transcript_file {
        Some(path) => Box::new(FileTranscript(path.clone())),
        None => Box::new(StaticTranscript(args.transcript.clone())),
    };

    let result = session::run_step(step, &config, oracle.as_ref())?;
    report(&result, step.expected_transcript.as_deref(), args.json)
}

fn handle_score(args: &ScoreArgs) -> Result<()> {
    let lesson = Lesson::load(&args.lesson)?;
    let step = lesson.step(args.step)?;
    let reference = session::load_reference(step, 44_100)?;
    let attempt = decoder::decode_audio(&args.attempt)
        .with_context(|| format!("failed to decode attempt {}", args.attempt.display()))?;
    let result = session::score_attempt(step, &reference, &attempt, &args.transcript)?;
    report(&result, step.expected_transcript.as_deref(), args.json)
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let audio = decoder::decode_audio(&args.input)?;
    let series = FeatureExtractor::new().extract(&audio);
    println!(
        "{}: {} frames, {:.2}s at {} Hz",
        args.input.display(),
        series.len(),
        audio.duration_secs(),
        audio.sample_rate
    );
    let classes: Vec<String> = series
        .notes
        .iter()
        .map(|note| match note {
            PitchClass::Silent => "-".to_string(),
            PitchClass::Note(class) => class.to_string(),
        })
        .collect();
    println!("frames: {}", classes.join(" "));
    println!("melody: {:?}", compress_melody(&series.notes));
    Ok(())
}

fn report(result: &ScoreResult, expected: Option<&str>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("Оценка: {}", result.score);
    println!("{}", result.feedback.message());
    if let Some(expected) = expected {
        if !result.word_matches.is_empty() {
            let marked: Vec<String> = expected
                .split_whitespace()
                .zip(&result.word_matches)
                .map(|(word, matched)| {
                    if *matched {
                        format!("[{}]", word)
                    } else {
                        word.to_string()
                    }
                })
                .collect();
            println!("Слова: {}", marked.join(" "));
        }
    }
    Ok(())
}
