// error.rs
//
// Caller-facing error types for task operations.

use std::fmt;
use uuid::Uuid;

use crate::insights::InsightError;
use crate::task::TaskStatus;

/// Errors reported synchronously to the caller of a task operation
#[derive(Debug, Clone)]
pub enum TaskError {
    /// No task registered under this id
    NotFound(Uuid),
    /// The task has no transcript yet, so there is nothing to analyze
    MissingTranscript(Uuid),
    /// The requested transition is not allowed from the task's current state
    InvalidState(TaskStatus),
    /// Prompt template rejected (e.g. missing the {{text}} placeholder)
    InvalidPrompt(String),
    /// No model name was provided for insight generation
    NoModelSelected,
    /// Insight generation failed; the transcript is untouched and the
    /// request may be retried
    Insight(InsightError),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::NotFound(id) => write!(f, "Task not found: {}", id),
            TaskError::MissingTranscript(id) => {
                write!(f, "Task {} has no transcript to generate insights from", id)
            }
            TaskError::InvalidState(status) => {
                write!(f, "Cannot generate insights while the task is '{}'", status)
            }
            TaskError::InvalidPrompt(msg) => write!(f, "Invalid prompt: {}", msg),
            TaskError::NoModelSelected => write!(f, "No model selected for insight generation"),
            TaskError::Insight(e) => write!(f, "Failed to generate insights: {}", e),
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Insight(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InsightError> for TaskError {
    fn from(e: InsightError) -> Self {
        TaskError::Insight(e)
    }
}
