// transcriber-core - Task lifecycle and transcript reconciliation engine
//
// Drives audio transcription jobs through their states (upload, transcribe,
// optional diarization, insight generation with retries) and merges
// independently-timestamped transcription and diarization streams into a
// single coherent transcript view.
//
// The speech-to-text engine, the diarization engine and the insight language
// model are external collaborators behind traits; this crate owns the task
// state machine, the shared task store and the reconciliation algorithms.

pub mod config;
pub mod engines;
pub mod error;
pub mod insights;
pub mod orchestrator;
pub mod task;
pub mod transcript;

// Re-export the main public API
pub use config::{allowed_file, OrchestratorConfig, DEFAULT_INSIGHTS_PROMPT};
pub use engines::{
    DiarizationError, Diarizer, SpeechToText, TranscriptionError, TranscriptionOutput,
};
pub use error::TaskError;
pub use insights::{InsightError, InsightProvider, OllamaConfig, OllamaInsights};
pub use orchestrator::JobOrchestrator;
pub use task::{Task, TaskStatus, TaskStore};
pub use transcript::{
    find_speaker, format_time, select_best_text, DiarizationSegment, SpeakerStats,
    SpeakerSummary, TextSource, TranscriptSegment, TranscriptionResult, UNKNOWN_SPEAKER,
};
