// transcript/select.rs
//
// Picks the richest available transcript representation for insight
// generation. The priority policy is an explicit ordered list, not control
// flow, so it stays testable.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TranscriptionResult;

/// Which transcript representation was chosen for insight generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSource {
    SpeakerAttributed,
    Timestamped,
    Plain,
}

impl TextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSource::SpeakerAttributed => "speaker-attributed",
            TextSource::Timestamped => "timestamped",
            TextSource::Plain => "plain",
        }
    }
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the best text representation from a completed transcription.
///
/// Priority, highest first: combined speaker-attributed text, speakers-only
/// text, timestamped text, plain text. Plain text is the guaranteed
/// fallback, so selection is total: absence of richer representations
/// degrades gracefully rather than erroring.
pub fn select_best_text(result: &TranscriptionResult) -> (String, TextSource) {
    let candidates = [
        (result.combined_text.as_deref(), TextSource::SpeakerAttributed),
        (result.speakers_text.as_deref(), TextSource::SpeakerAttributed),
        (result.timestamped_text.as_deref(), TextSource::Timestamped),
    ];

    for (text, source) in candidates {
        if let Some(text) = text {
            if !text.is_empty() {
                return (text.to_string(), source);
            }
        }
    }

    (result.text.clone(), TextSource::Plain)
}
