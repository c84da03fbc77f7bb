// transcript/types.rs
//
// Data types shared between the transcription and diarization streams.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One utterance unit from the speech-to-text engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Seconds from the start of the recording
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// One speaker-attributed interval from the diarization engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarizationSegment {
    pub start: f64,
    pub end: f64,
    /// Opaque speaker label, e.g. "SPEAKER_00"
    pub speaker: String,
}

impl DiarizationSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Per-speaker aggregate over a set of diarization segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Total owned interval duration in seconds, rounded to 2 decimals
    pub total_duration: f64,
    pub segment_count: usize,
    /// Share of the total diarized duration, rounded to 1 decimal
    pub percentage: f64,
}

/// Summary of all speakers found in a diarization run.
///
/// Derived data: recomputed whenever the diarization segments change and
/// never persisted independently of its source segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSummary {
    pub speakers: BTreeMap<String, SpeakerStats>,
    pub total_speakers: usize,
    pub total_duration: f64,
    pub total_segments: usize,
}

impl SpeakerSummary {
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

/// Everything a finished transcription run produced for one task.
///
/// `combined_text` is present only when both the transcript segments and
/// the diarization segments are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Plain transcript text, always present once transcription succeeds
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub segments: Vec<TranscriptSegment>,
    /// One "[start - end] text" line per transcript segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamped_text: Option<String>,
    /// One "[start - end] speaker (duration)" line per diarization segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers_text: Option<String>,
    /// Speaker-attributed and timestamped transcript lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarization: Option<Vec<DiarizationSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_summary: Option<SpeakerSummary>,
    /// Set when diarization was requested but failed; transcription-only
    /// output is still produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarization_error: Option<String>,
}

impl TranscriptionResult {
    /// Transcription-only result, before any diarization fields are filled in
    pub fn new(text: String, language: Option<String>, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            text,
            language,
            segments,
            timestamped_text: None,
            speakers_text: None,
            combined_text: None,
            diarization: None,
            speaker_summary: None,
            diarization_error: None,
        }
    }
}
