//! Lesson content: the static data set of reference phrases a learner
//! practices against.
//!
//! Mirrors the original lesson database: each step carries an audio file
//! and/or discrete target frequencies, the display lyrics, a translation,
//! and the transcript the speech-recognition oracle is expected to produce.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Default per-note duration when synthesizing a presence-mode reference.
pub const DEFAULT_NOTE_DURATION: f32 = 0.5;

/// A full lesson parsed from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<LessonStep>,
}

/// One practice step: either a recorded reference phrase with lyrics, or a
/// bare "find the right pitches" melody given as target frequencies.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonStep {
    /// Reference audio file, relative to the lesson file's directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Display lyrics.
    #[serde(default)]
    pub text: String,
    /// Translation shown alongside the lyrics.
    #[serde(default, alias = "trans")]
    pub translation: Option<String>,
    /// Transcript the recognition oracle produces for the reference.
    #[serde(default, alias = "google_text")]
    pub expected_transcript: Option<String>,
    /// Discrete target note frequencies for presence-mode steps.
    #[serde(default)]
    pub target_frequencies: Vec<f32>,
    /// Per-note duration in seconds when the reference is synthesized.
    #[serde(default)]
    pub note_duration: Option<f32>,
}

impl Lesson {
    /// Load a lesson from a JSON file, resolving step audio paths relative
    /// to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read lesson file {}", path.display()))?;
        let mut lesson = Self::parse(&data)?;
        if let Some(base) = path.parent() {
            for step in &mut lesson.steps {
                if let Some(file) = &step.file {
                    if file.is_relative() {
                        step.file = Some(base.join(file));
                    }
                }
            }
        }
        Ok(lesson)
    }

    /// Parse a lesson from inline JSON.
    pub fn parse(raw: &str) -> Result<Self> {
        let lesson: Lesson = serde_json::from_str(raw).context("failed to parse lesson JSON")?;
        lesson.validate()?;
        Ok(lesson)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.steps.is_empty(), "lesson must contain at least one step");
        for (idx, step) in self.steps.iter().enumerate() {
            step.validate(idx)?;
        }
        Ok(())
    }

    pub fn step(&self, index: usize) -> Result<&LessonStep> {
        self.steps.get(index).with_context(|| {
            format!(
                "lesson has {} steps; step {} does not exist",
                self.steps.len(),
                index
            )
        })
    }
}

impl LessonStep {
    fn validate(&self, index: usize) -> Result<()> {
        ensure!(
            self.file.is_some() || !self.target_frequencies.is_empty(),
            "lesson step {} needs a reference file or target frequencies",
            index
        );
        for &frequency in &self.target_frequencies {
            ensure!(
                frequency > 0.0,
                "lesson step {} has non-positive target frequency {}",
                index,
                frequency
            );
        }
        if let Some(duration) = self.note_duration {
            ensure!(
                duration > 0.0,
                "lesson step {} note_duration must be positive",
                index
            );
        }
        Ok(())
    }

    /// Presence-mode steps have frequencies but no recorded reference.
    pub fn is_presence_only(&self) -> bool {
        self.file.is_none()
    }

    pub fn note_duration(&self) -> f32 {
        self.note_duration.unwrap_or(DEFAULT_NOTE_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_original_style_step() {
        let json = r#"{
            "name": "lesson1",
            "steps": [
                {
                    "file": "1.wav",
                    "text": "Ас мув ӆув ма̄нты...",
                    "trans": "Обской земли сказ...",
                    "google_text": "Тьёй тьёй рабц рабц"
                }
            ]
        }"#;
        let lesson = Lesson::parse(json).unwrap();
        assert_eq!(lesson.name.as_deref(), Some("lesson1"));
        let step = lesson.step(0).unwrap();
        assert_eq!(step.translation.as_deref(), Some("Обской земли сказ..."));
        assert_eq!(
            step.expected_transcript.as_deref(),
            Some("Тьёй тьёй рабц рабц")
        );
        assert!(!step.is_presence_only());
    }

    #[test]
    fn parses_presence_step() {
        let json = r#"{
            "steps": [
                {"text": "до ре ми", "target_frequencies": [261.63, 293.66, 329.63]}
            ]
        }"#;
        let lesson = Lesson::parse(json).unwrap();
        let step = lesson.step(0).unwrap();
        assert!(step.is_presence_only());
        assert_eq!(step.target_frequencies.len(), 3);
        assert_eq!(step.note_duration(), DEFAULT_NOTE_DURATION);
    }

    #[test]
    fn rejects_step_without_reference() {
        let json = r#"{"steps": [{"text": "пусто"}]}"#;
        assert!(Lesson::parse(json).is_err());
    }

    #[test]
    fn rejects_empty_lesson() {
        assert!(Lesson::parse(r#"{"steps": []}"#).is_err());
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let json = r#"{"steps": [{"target_frequencies": [0.0]}]}"#;
        assert!(Lesson::parse(json).is_err());
    }

    #[test]
    fn missing_step_index_is_an_error() {
        let json = r#"{"steps": [{"target_frequencies": [440.0]}]}"#;
        let lesson = Lesson::parse(json).unwrap();
        assert!(lesson.step(3).is_err());
    }
}
