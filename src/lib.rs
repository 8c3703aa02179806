//! singalyzer: singing and pronunciation practice trainer.
//!
//! Plays a reference phrase, records the learner's attempt, and scores how
//! closely the attempt matches the reference on three axes: melodic contour,
//! rhythmic envelope, and spoken-word content. The analysis and scoring core
//! is pure and offline; audio I/O and transcript acquisition live in the
//! orchestration layers around it.

pub mod analysis;
pub mod audio;
pub mod lesson;
pub mod scoring;
pub mod session;
pub mod types;
