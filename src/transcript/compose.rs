// transcript/compose.rs
//
// Builds the textual transcript views (timestamped, speaker-attributed,
// combined) and the per-speaker time summary from raw segment lists.

use std::collections::BTreeMap;

use super::align::find_speaker;
use super::time::{format_duration, format_time};
use super::types::{DiarizationSegment, SpeakerStats, SpeakerSummary, TranscriptSegment};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One "[start - end] text" line per transcript segment, in input order.
/// Segments must already be time-ordered; no re-sorting is performed.
pub fn format_with_timestamps(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|seg| {
            format!(
                "[{} - {}] {}",
                format_time(seg.start),
                format_time(seg.end),
                seg.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One "[start - end] speaker (duration s)" line per diarization segment
pub fn format_with_speakers(diar_segments: &[DiarizationSegment]) -> String {
    diar_segments
        .iter()
        .map(|seg| {
            format!(
                "[{} - {}] {} ({}s)",
                format_time(seg.start),
                format_time(seg.end),
                seg.speaker,
                format_duration(seg.duration())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Merge the two streams: one "[start - end] speaker: text" line per
/// transcript segment, with the speaker resolved by midpoint/overlap
/// alignment against the diarization segments.
pub fn combine(
    transcript_segments: &[TranscriptSegment],
    diar_segments: &[DiarizationSegment],
) -> String {
    transcript_segments
        .iter()
        .map(|seg| {
            let speaker = find_speaker(seg.start, seg.end, diar_segments);
            format!(
                "[{} - {}] {}: {}",
                format_time(seg.start),
                format_time(seg.end),
                speaker,
                seg.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accumulate per-speaker duration, segment count and share of the total
/// diarized time. Empty input yields an empty summary, not an error.
pub fn summarize_speakers(diar_segments: &[DiarizationSegment]) -> SpeakerSummary {
    if diar_segments.is_empty() {
        return SpeakerSummary::default();
    }

    let mut durations: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut total_duration = 0.0;

    for seg in diar_segments {
        let duration = seg.duration();
        let entry = durations.entry(seg.speaker.clone()).or_insert((0.0, 0));
        entry.0 += duration;
        entry.1 += 1;
        total_duration += duration;
    }

    let speakers = durations
        .into_iter()
        .map(|(speaker, (duration, count))| {
            let percentage = if total_duration > 0.0 {
                round1(duration / total_duration * 100.0)
            } else {
                0.0
            };
            (
                speaker,
                SpeakerStats {
                    total_duration: round2(duration),
                    segment_count: count,
                    percentage,
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    SpeakerSummary {
        total_speakers: speakers.len(),
        speakers,
        total_duration: round2(total_duration),
        total_segments: diar_segments.len(),
    }
}
