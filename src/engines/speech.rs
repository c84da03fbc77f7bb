// engines/speech.rs
//
// Speech-to-text engine contract.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::transcript::TranscriptSegment;

/// Errors from the speech-to-text engine
#[derive(Debug, Clone)]
pub enum TranscriptionError {
    /// Source file missing or unreadable
    FileNotFound(String),
    /// Engine reported a failure
    EngineFailed(String),
}

impl fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionError::FileNotFound(path) => {
                write!(f, "Audio file not found: {}", path)
            }
            TranscriptionError::EngineFailed(msg) => {
                write!(f, "Transcription engine failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for TranscriptionError {}

/// Raw output of one transcription run
#[derive(Debug, Clone)]
pub struct TranscriptionOutput {
    /// Full plain-text transcript
    pub text: String,
    /// Detected language, when the engine reports one
    pub language: Option<String>,
    /// Timestamped utterance segments, ordered by start time
    pub segments: Vec<TranscriptSegment>,
}

/// Contract for the external speech-recognition engine
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the audio file at `file_path`. When `want_timestamps` is
    /// false the engine may skip segment extraction and return text only.
    async fn transcribe(
        &self,
        file_path: &Path,
        want_timestamps: bool,
    ) -> Result<TranscriptionOutput, TranscriptionError>;
}
