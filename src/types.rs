//! Core types shared across the singalyzer analysis and scoring pipeline.

/// Raw decoded audio (mono, f32 samples normalized to [-1.0, 1.0]).
#[derive(Debug, Clone, Default)]
pub struct AudioData {
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Octave-independent note identity.
///
/// Frequencies an octave apart map to the same class; melodic-shape scoring
/// cares about note identity, not absolute octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchClass {
    /// No usable pitch in the frame (silence or unvoiced input).
    Silent,
    /// Chroma index in 0..=11, with A mapped to 9.
    Note(u8),
}

impl PitchClass {
    pub fn is_silent(&self) -> bool {
        matches!(self, PitchClass::Silent)
    }

    pub fn note(&self) -> Option<u8> {
        match self {
            PitchClass::Silent => None,
            PitchClass::Note(class) => Some(*class),
        }
    }
}

/// Fundamental-frequency estimate for one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Detected frequency in Hz; `None` signals silence or unvoiced input.
    pub frequency: Option<f32>,
    /// Reliability of the autocorrelation peak, in [0, 1].
    pub confidence: f32,
}

impl PitchEstimate {
    pub fn unvoiced() -> Self {
        Self {
            frequency: None,
            confidence: 0.0,
        }
    }
}

/// Parallel per-frame time series produced by feature extraction.
///
/// Invariant: `notes` and `volume` always have the same length (one entry per
/// frame), or are both empty.
#[derive(Debug, Clone, Default)]
pub struct FeatureSeries {
    pub notes: Vec<PitchClass>,
    /// RMS loudness per frame, normalized to the buffer's own peak
    /// (max observed RMS = 1.0).
    pub volume: Vec<f32>,
}

impl FeatureSeries {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
