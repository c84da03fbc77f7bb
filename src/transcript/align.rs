// transcript/align.rs
//
// Aligns transcript intervals with diarization speaker intervals. The two
// streams are timestamped independently and never share boundaries.

use super::types::DiarizationSegment;

/// Label returned when no speaker can be attributed to an interval
pub const UNKNOWN_SPEAKER: &str = "SPEAKER_UNKNOWN";

/// Find the speaker label that best matches the interval [start, end].
///
/// First pass: the speaker of the first segment containing the interval
/// midpoint. Second pass: the speaker with the maximum temporal overlap,
/// first maximum winning on ties. Segments should be pre-sorted by start so
/// both passes are deterministic. Never fails: with no candidates the
/// result is [`UNKNOWN_SPEAKER`].
pub fn find_speaker(start: f64, end: f64, diar_segments: &[DiarizationSegment]) -> String {
    let mid = (start + end) / 2.0;

    for seg in diar_segments {
        if seg.start <= mid && mid <= seg.end {
            return seg.speaker.clone();
        }
    }

    // No containing segment; fall back to maximum overlap
    let mut best: Option<(&DiarizationSegment, f64)> = None;
    for seg in diar_segments {
        let overlap = (end.min(seg.end) - start.max(seg.start)).max(0.0);
        if overlap > 0.0 && best.map_or(true, |(_, b)| overlap > b) {
            best = Some((seg, overlap));
        }
    }

    best.map(|(seg, _)| seg.speaker.clone())
        .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string())
}
