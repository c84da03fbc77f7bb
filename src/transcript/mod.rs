// transcript/mod.rs
//
// Transcript reconciliation: types, time formatting, speaker alignment,
// composed text views and source selection.
//
// Module structure:
// - types.rs: segment, summary and result types
// - time.rs: clock-string formatting for second offsets
// - align.rs: diarization-to-transcription speaker alignment
// - compose.rs: timestamped, speaker and combined text views
// - select.rs: best-text selection for insight generation

pub mod align;
pub mod compose;
pub mod select;
pub mod time;
pub mod types;

pub use align::{find_speaker, UNKNOWN_SPEAKER};
pub use compose::{
    combine, format_with_speakers, format_with_timestamps, summarize_speakers,
};
pub use select::{select_best_text, TextSource};
pub use time::format_time;
pub use types::{DiarizationSegment, SpeakerStats, SpeakerSummary, TranscriptSegment, TranscriptionResult};
