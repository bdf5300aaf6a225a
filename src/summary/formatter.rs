pub const NO_ISSUES_MESSAGE: &str = "😄  No Issue";

/// Joins summary lines with newlines, or returns [`NO_ISSUES_MESSAGE`]
/// when there is nothing to show.
pub fn format_summary(lines: &[String]) -> String {
    let summary = lines.join("\n");

    if summary.is_empty() {
        NO_ISSUES_MESSAGE.to_string()
    } else {
        summary
    }
}
