//! Display formatting for countdown readouts

/// Format milliseconds as `mm:ss`, rounding partial seconds up so a
/// countdown only reads 00:00 once it has actually run out
pub fn format_clock(remaining_ms: u64) -> String {
    let seconds = remaining_ms.div_ceil(1_000);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
