// engines/mod.rs
//
// Trait contracts for the external speech-to-text and diarization engines.
// The engines themselves are black boxes; this crate only consumes their
// timestamped output.

pub mod diarize;
pub mod speech;

pub use diarize::{DiarizationError, Diarizer};
pub use speech::{SpeechToText, TranscriptionError, TranscriptionOutput};
