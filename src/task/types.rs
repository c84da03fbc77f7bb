// task/types.rs
//
// Task record and status enum for the transcription/insight lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::transcript::TranscriptionResult;

/// Per-task option key: whether speaker diarization was requested
pub const DIARIZATION_OPTION: &str = "diarization";

/// Lifecycle states of a transcription task.
///
/// `Error` is terminal; `ErrorInsights` keeps the transcript around so
/// insight generation can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Uploaded,
    Transcribing,
    Diarizing,
    TranscriptionCompleted,
    GeneratingInsights,
    CompletedWithInsights,
    Error,
    ErrorInsights,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Uploaded => "uploaded",
            TaskStatus::Transcribing => "transcribing",
            TaskStatus::Diarizing => "diarizing",
            TaskStatus::TranscriptionCompleted => "transcription_completed",
            TaskStatus::GeneratingInsights => "generating_insights",
            TaskStatus::CompletedWithInsights => "completed_with_insights",
            TaskStatus::Error => "error",
            TaskStatus::ErrorInsights => "error_insights",
        }
    }

    /// Processing cannot resume from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Error)
    }

    /// States from which insight generation may be started or retried
    pub fn can_generate_insights(&self) -> bool {
        matches!(
            self,
            TaskStatus::TranscriptionCompleted
                | TaskStatus::CompletedWithInsights
                | TaskStatus::ErrorInsights
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end-to-end unit of work from upload through optional insight
/// generation.
///
/// `transcription_result` is written once by the orchestrator and never
/// replaced; only the insight-related fields (`insights_text`,
/// `current_prompt`, `selected_model`) plus status, message and progress
/// are mutated after that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub status: TaskStatus,
    pub message: String,
    pub progress: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_result: Option<TranscriptionResult>,
    /// Overwritten on each insight attempt, cleared while one is running
    pub insights_text: Option<String>,
    pub current_prompt: String,
    pub selected_model: Option<String>,
    /// Free-form per-task options, e.g. whether diarization was requested
    #[serde(default)]
    pub options: serde_json::Map<String, Value>,
}

impl Task {
    pub fn new(id: Uuid, default_prompt: &str) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            message: "Task created".to_string(),
            progress: "0%".to_string(),
            created_at: Utc::now(),
            transcription_result: None,
            insights_text: None,
            current_prompt: default_prompt.to_string(),
            selected_model: None,
            options: serde_json::Map::new(),
        }
    }

    pub fn diarization_enabled(&self) -> bool {
        self.options
            .get(DIARIZATION_OPTION)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
