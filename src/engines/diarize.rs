// engines/diarize.rs
//
// Speaker diarization engine contract.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::transcript::DiarizationSegment;

/// Errors from the diarization engine. Diarization failures are non-fatal
/// to the task; the orchestrator degrades to transcription-only output.
#[derive(Debug, Clone)]
pub enum DiarizationError {
    FileNotFound(String),
    EngineFailed(String),
}

impl fmt::Display for DiarizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiarizationError::FileNotFound(path) => {
                write!(f, "Audio file not found: {}", path)
            }
            DiarizationError::EngineFailed(msg) => {
                write!(f, "Diarization engine failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for DiarizationError {}

/// Contract for the external diarization engine
#[async_trait]
pub trait Diarizer: Send + Sync {
    /// Attribute speech intervals in the audio file to anonymous speaker
    /// labels. The returned segments may be unsorted; callers sort by start
    /// time before use.
    async fn diarize(
        &self,
        file_path: &Path,
        min_speakers: u32,
        max_speakers: u32,
    ) -> Result<Vec<DiarizationSegment>, DiarizationError>;
}
