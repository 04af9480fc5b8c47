//! Display helpers for free-text study advice.
//!
//! The completion layer hands advice back verbatim; turning markdown-ish
//! bullet markers into display bullets happens here, on the caller side.

/// Glyph that replaces `* ` and `- ` line markers.
pub const BULLET: &str = "• ";

/// Split advice into display lines, rewriting leading `* ` / `- ` markers.
///
/// Lines without a marker are returned unchanged, blank lines included.
#[must_use]
pub fn format_advice_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| {
            match line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
                Some(rest) => format!("{BULLET}{rest}"),
                None => line.to_string(),
            }
        })
        .collect()
}
