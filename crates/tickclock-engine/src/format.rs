//! Clock display formatting.

/// Renders elapsed milliseconds as `MM:SS:HH` (minutes, seconds, hundredths).
///
/// Minutes grow past two digits rather than wrapping. Negative or non-finite
/// input renders as zero.
pub fn format_clock(ms: f64) -> String {
    let ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };
    let total_hundredths = (ms / 10.0).floor() as u64;

    let hundredths = total_hundredths % 100;
    let total_seconds = total_hundredths / 100;
    let seconds = total_seconds % 60;
    let minutes = total_seconds / 60;

    format!("{minutes:02}:{seconds:02}:{hundredths:02}")
}
