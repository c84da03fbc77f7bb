// transcript/time.rs
//
// Clock-string formatting for second offsets.

/// Format a non-negative seconds offset as MM:SS, or HH:MM:SS from one hour
/// up. Sub-second remainder is truncated, not rounded.
pub fn format_time(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a duration in seconds rounded to 2 decimals, without trailing
/// zeros (e.g. 2.6, not 2.60)
pub(crate) fn format_duration(seconds: f64) -> String {
    let rounded = (seconds * 100.0).round() / 100.0;
    format!("{}", rounded)
}
