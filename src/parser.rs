/// Line classifiers shared by the rewrite stages
///
/// Every classifier looks at a single physical line (no trailing newline). The
/// block-level ones run after escaping, so a quote marker arrives as `&gt;`.
use crate::ast::{Heading, ListKind};

const FENCE: &str = "```";
const QUOTE_MARKER: &str = "&gt;";

/// Check if a line opens a fenced code block
/// Returns the language token (possibly empty) following the fence
pub fn is_fenced_code_start(line: &str) -> Option<&str> {
    let after_fence = line.trim().strip_prefix(FENCE)?;

    // Inline code like ```x``` on one line is not a fence
    if after_fence.contains('`') {
        return None;
    }

    // Only a single language token may follow the fence
    let info = after_fence.trim();
    if info.split_whitespace().count() > 1 {
        return None;
    }

    Some(info)
}

/// Check if a line is a valid closing fence
pub fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Find the closing fence for an opening fence at `lines[0]`
/// Returns the index of the closing line, or None if the fence never closes
pub fn find_closing_fence(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_closing_fence(line))
        .map(|(i, _)| i)
}

pub fn parse_atx_heading(line: &str) -> Option<Heading> {
    // Count leading # characters
    let hash_count = line.chars().take_while(|&c| c == '#').count();

    // Must be 1-6 hashes
    if hash_count == 0 || hash_count > 6 {
        return None;
    }

    // Must have whitespace after hashes
    let after_hashes = &line[hash_count..];
    if !after_hashes.starts_with([' ', '\t']) {
        return None;
    }

    let text = after_hashes.trim();
    if text.is_empty() {
        return None;
    }

    Some(Heading {
        level: hash_count as u8,
        text: text.to_string(),
    })
}

pub fn is_thematic_break(line: &str) -> bool {
    matches!(line.trim(), "---" | "***")
}

/// Strip a `> ` marker, returning the quoted text
pub fn strip_blockquote_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(QUOTE_MARKER)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

/// Classify a list item line, returning its kind and item text
pub fn parse_list_item(line: &str) -> Option<(ListKind, &str)> {
    let trimmed = line.trim_start();

    let (kind, after_marker) = if let Some(rest) = trimmed.strip_prefix(['*', '-']) {
        (ListKind::Unordered, rest)
    } else {
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let rest = trimmed[digits..].strip_prefix('.')?;
        (ListKind::Ordered, rest)
    };

    // The marker must be followed by whitespace and some content
    if !after_marker.starts_with(char::is_whitespace) {
        return None;
    }
    let text = after_marker.trim();
    if text.is_empty() {
        return None;
    }

    Some((kind, text))
}

pub fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// A separator row: pipes, dashes, colons and spaces only, with at least one dash
pub fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Split a table row into trimmed cells
/// One leading and one trailing pipe are removed before splitting
pub fn split_table_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fence_start_with_language() {
        assert_eq!(is_fenced_code_start("```rust"), Some("rust"));
        assert_eq!(is_fenced_code_start("```"), Some(""));
        assert_eq!(is_fenced_code_start("``` x y"), None);
        assert_eq!(is_fenced_code_start("```code```"), None);
        assert_eq!(is_fenced_code_start("``"), None);
    }

    #[test]
    fn test_find_closing_fence() {
        let lines = ["```", "let x = 1;", "```", "after"];
        assert_eq!(find_closing_fence(&lines), Some(2));
        assert_eq!(find_closing_fence(&["```", "never closed"]), None);
    }

    #[test]
    fn test_heading_levels() {
        let heading = parse_atx_heading("### Section  ").unwrap();
        assert_eq!(heading.level, 3);
        assert_eq!(heading.text, "Section");

        assert!(parse_atx_heading("####### seven").is_none());
        assert!(parse_atx_heading("#hashtag").is_none());
        assert!(parse_atx_heading("# ").is_none());
    }

    #[test]
    fn test_thematic_break() {
        assert!(is_thematic_break("---"));
        assert!(is_thematic_break("***"));
        assert!(!is_thematic_break("----x"));
        assert!(!is_thematic_break("- - -"));
    }

    #[test]
    fn test_blockquote_marker_is_escaped() {
        assert_eq!(strip_blockquote_marker("&gt; quoted"), Some("quoted"));
        assert_eq!(strip_blockquote_marker("&gt;quoted"), None);
        assert_eq!(strip_blockquote_marker("> raw"), None);
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            parse_list_item("* star"),
            Some((ListKind::Unordered, "star"))
        );
        assert_eq!(
            parse_list_item("- dash"),
            Some((ListKind::Unordered, "dash"))
        );
        assert_eq!(
            parse_list_item("12. twelfth"),
            Some((ListKind::Ordered, "twelfth"))
        );
        assert_eq!(parse_list_item("*emphasis*"), None);
        assert_eq!(parse_list_item("3.14 is pi"), None);
        assert_eq!(parse_list_item("---"), None);
    }

    #[test]
    fn test_table_rows() {
        assert!(is_table_row("| a | b |"));
        assert!(!is_table_row("a | b"));
        assert!(is_table_separator("| :--- | ---: |"));
        assert!(!is_table_separator("| a | b |"));
        assert!(!is_table_separator("| : |"));
        assert_eq!(split_table_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_table_row("| a || c"), vec!["a", "", "c"]);
    }
}
