//! Title and summary extraction from raw Markdown.

use serde::{Deserialize, Serialize};

/// Maximum summary length, in characters
pub const SUMMARY_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Text of the first level-one heading, if any
    pub title: Option<String>,
    /// First non-heading line, trimmed and truncated
    pub summary: String,
}

/// Extract a title and summary from the raw Markdown text.
///
/// The title is taken from the first `# heading` line. The summary is the
/// first non-blank line that does not start with `#`, cut to
/// [`SUMMARY_MAX_CHARS`] characters.
pub fn extract_metadata(markdown: &str) -> Metadata {
    let lines = || markdown.lines().map(|line| line.trim_end_matches('\r'));

    let title = lines()
        .filter_map(|line| line.strip_prefix('#'))
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string);

    let summary = lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(line, SUMMARY_MAX_CHARS))
        .unwrap_or_default();

    Metadata { title, summary }
}

/// Cut `text` to at most `max` characters, on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_and_summary() {
        let meta = extract_metadata("# Test Title\n\nThis is the first paragraph.\n\nMore.");
        assert_eq!(meta.title.as_deref(), Some("Test Title"));
        assert_eq!(meta.summary, "This is the first paragraph.");
    }

    #[test]
    fn test_only_level_one_heading_is_title() {
        let meta = extract_metadata("## Sub\n# Main\ntext");
        assert_eq!(meta.title.as_deref(), Some("Main"));
        assert_eq!(meta.summary, "text");
    }

    #[test]
    fn test_no_heading() {
        let meta = extract_metadata("   \nJust text  \n");
        assert_eq!(meta.title, None);
        assert_eq!(meta.summary, "Just text");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_metadata(""), Metadata::default());
    }

    #[test]
    fn test_hashtag_line_is_not_a_title() {
        let meta = extract_metadata("#tag\n");
        assert_eq!(meta.title, None);
        assert_eq!(meta.summary, "");
    }

    #[test]
    fn test_summary_is_truncated() {
        let long = "א".repeat(250);
        let meta = extract_metadata(&long);
        assert_eq!(meta.summary.chars().count(), SUMMARY_MAX_CHARS);
    }

    #[test]
    fn test_crlf_input() {
        let meta = extract_metadata("# Title\r\nBody\r\n");
        assert_eq!(meta.title.as_deref(), Some("Title"));
        assert_eq!(meta.summary, "Body");
    }
}
