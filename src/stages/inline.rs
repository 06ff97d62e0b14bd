/// Inline formatting stage: emphasis, strikethrough, images and links
///
/// Rules run in a fixed precedence, each over the output of the previous one,
/// and never match across a line break. Link and image targets are set aside
/// while the emphasis rules run, so delimiters in URLs stay literal.
use super::table::cell_limit;
use crate::escape::{escape_attribute, strip_tags};
use crate::parser::is_thematic_break;

/// Marks the start of a hidden link target
pub const TARGET_OPEN: char = '\u{E002}';
/// Marks the end of a hidden link target
pub const TARGET_CLOSE: char = '\u{E003}';

/// A delimiter-pair rule such as `**text**`
struct Delimited {
    delimiter: &'static str,
    open: &'static str,
    close: &'static str,
}

const BOLD_ITALIC: &str = "<strong><em>";
const BOLD_ITALIC_CLOSE: &str = "</em></strong>";

const EMPHASIS_RULES: [Delimited; 7] = [
    Delimited {
        delimiter: "***",
        open: BOLD_ITALIC,
        close: BOLD_ITALIC_CLOSE,
    },
    Delimited {
        delimiter: "___",
        open: BOLD_ITALIC,
        close: BOLD_ITALIC_CLOSE,
    },
    Delimited {
        delimiter: "**",
        open: "<strong>",
        close: "</strong>",
    },
    Delimited {
        delimiter: "__",
        open: "<strong>",
        close: "</strong>",
    },
    Delimited {
        delimiter: "*",
        open: "<em>",
        close: "</em>",
    },
    Delimited {
        delimiter: "_",
        open: "<em>",
        close: "</em>",
    },
    Delimited {
        delimiter: "~~",
        open: "<del>",
        close: "</del>",
    },
];

pub fn format_inline(text: &str) -> String {
    text.split('\n')
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(line: &str) -> String {
    // `***` on its own is a rule, not emphasis
    if is_thematic_break(line) {
        return line.to_string();
    }

    let (mut line, targets) = hide_targets(line);
    for rule in &EMPHASIS_RULES {
        line = replace_delimited(&line, rule);
    }
    let line = restore_targets(&line, &targets);
    let line = render_images(&line);
    render_links(&line)
}

/// Swap the url of every `[label](url)` for a token
fn hide_targets(line: &str) -> (String, Vec<&str>) {
    let mut targets = Vec::new();
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find('[') {
        result.push_str(&rest[..start]);
        match parse_bracketed(&rest[start..], true) {
            Some((label, url, consumed)) => {
                result.push_str(&format!(
                    "[{label}]({TARGET_OPEN}{}{TARGET_CLOSE})",
                    targets.len()
                ));
                targets.push(url);
                rest = &rest[start + consumed..];
            }
            None => {
                result.push('[');
                rest = &rest[start + 1..];
            }
        }
    }

    result.push_str(rest);
    (result, targets)
}

fn restore_targets(line: &str, targets: &[&str]) -> String {
    if targets.is_empty() {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find(TARGET_OPEN) {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + TARGET_OPEN.len_utf8()..];
        let Some(end) = after_open.find(TARGET_CLOSE) else {
            rest = after_open;
            continue;
        };
        if let Some(url) = after_open[..end]
            .parse::<usize>()
            .ok()
            .and_then(|index| targets.get(index))
        {
            result.push_str(url);
        }
        rest = &after_open[end + TARGET_CLOSE.len_utf8()..];
    }
    result.push_str(rest);
    result
}

/// Replace every `delimiter text delimiter` pair on the line, non-greedy
///
/// The content may not start or end with whitespace. Underscore delimiters
/// must also sit at word boundaries, so `snake_case_name` is left alone.
fn replace_delimited(line: &str, rule: &Delimited) -> String {
    let delimiter = rule.delimiter;
    let word_bound = delimiter.starts_with('_');
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find(delimiter) {
        let content_start = open + delimiter.len();
        let before = result
            .chars()
            .last()
            .filter(|_| open == 0)
            .or_else(|| rest[..open].chars().last());

        let opens = rest[content_start..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace())
            && !(word_bound && before.is_some_and(char::is_alphanumeric));

        let close = if opens {
            find_closer(&rest[content_start..], delimiter, word_bound)
        } else {
            None
        };

        match close {
            Some(close) => {
                let content = &rest[content_start..content_start + close];
                result.push_str(&rest[..open]);
                result.push_str(rule.open);
                result.push_str(content);
                result.push_str(rule.close);
                rest = &rest[content_start + close + delimiter.len()..];
            }
            None => {
                // Step over one character of the delimiter and keep looking
                let step = open + rest[open..].chars().next().map_or(1, char::len_utf8);
                result.push_str(&rest[..step]);
                rest = &rest[step..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Find the first valid closing delimiter in `content`
/// Returns its byte offset; the content before it is never empty
fn find_closer(content: &str, delimiter: &str, word_bound: bool) -> Option<usize> {
    // Emphasis never spans table cells
    let content = &content[..cell_limit(content)];

    let first_len = content.chars().next()?.len_utf8();
    let mut search_from = first_len;

    while let Some(offset) = content[search_from..].find(delimiter) {
        let close = search_from + offset;
        let before = content[..close].chars().last();
        let after = content[close + delimiter.len()..].chars().next();

        // A pair may not cut through tags an earlier rule produced
        let valid = before.is_some_and(|c| !c.is_whitespace())
            && !(word_bound && after.is_some_and(char::is_alphanumeric))
            && tags_balanced(&content[..close]);
        if valid {
            return Some(close);
        }

        search_from = close + content[close..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Whether every tag opened in `fragment` is closed in it, and vice versa
fn tags_balanced(fragment: &str) -> bool {
    let mut open: Vec<&str> = Vec::new();
    let mut rest = fragment;

    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start..].find('>') else {
            break;
        };
        let tag = &rest[start + 1..start + end];
        rest = &rest[start + end + 1..];

        if let Some(name) = tag.strip_prefix('/') {
            if open.pop() != Some(name) {
                return false;
            }
            continue;
        }
        let name = tag.split_whitespace().next().unwrap_or(tag);
        if name != "img" {
            open.push(name);
        }
    }

    open.is_empty()
}

/// Parse `[label](url)` at the start of `text`, within one table cell
/// Returns the label, the trimmed url and the number of bytes consumed
fn parse_bracketed(text: &str, allow_empty_label: bool) -> Option<(&str, &str, usize)> {
    let text = &text[..cell_limit(text)];
    let after_bracket = text.strip_prefix('[')?;
    let label_end = after_bracket.find(']')?;
    let label = &after_bracket[..label_end];

    if label.contains('[') || (label.is_empty() && !allow_empty_label) {
        return None;
    }

    let after_label = after_bracket[label_end + 1..].strip_prefix('(')?;
    let url_end = after_label.find(')')?;
    let url = after_label[..url_end].trim();
    if url.is_empty() {
        return None;
    }

    // '[' + label + "](" + url + ')'
    let consumed = 1 + label_end + 2 + url_end + 1;
    Some((label, url, consumed))
}

/// Replace `![alt](url)` with an image element
fn render_images(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find("![") {
        result.push_str(&rest[..start]);
        match parse_bracketed(&rest[start + 1..], true) {
            Some((alt, url, consumed)) => {
                result.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" style=\"max-width:100%\">",
                    escape_attribute(url),
                    escape_attribute(&strip_tags(alt))
                ));
                rest = &rest[start + 1 + consumed..];
            }
            None => {
                result.push('!');
                rest = &rest[start + 1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Replace `[text](url)` with an anchor opening in a new tab
fn render_links(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find('[') {
        result.push_str(&rest[..start]);
        let preceded_by_bang = result.ends_with('!');
        match parse_bracketed(&rest[start..], false).filter(|_| !preceded_by_bang) {
            Some((label, url, consumed)) => {
                result.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\">{label}</a>",
                    escape_attribute(url)
                ));
                rest = &rest[start + consumed..];
            }
            None => {
                result.push('[');
                rest = &rest[start + 1..];
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            format_inline("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
        assert_eq!(
            format_inline("__bold__ and _italic_"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_bold_italic() {
        assert_eq!(
            format_inline("***both*** and ___both___"),
            "<strong><em>both</em></strong> and <strong><em>both</em></strong>"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(format_inline("~~gone~~ stays"), "<del>gone</del> stays");
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(
            format_inline("*a* and *b*"),
            "<em>a</em> and <em>b</em>"
        );
    }

    #[test]
    fn test_delimiters_must_hug_content() {
        assert_eq!(format_inline("2 * 3 * 4"), "2 * 3 * 4");
        assert_eq!(format_inline("* item *x*"), "* item <em>x</em>");
    }

    #[test]
    fn test_underscores_inside_words() {
        assert_eq!(format_inline("snake_case_name"), "snake_case_name");
        assert_eq!(
            format_inline("call my_func _now_"),
            "call my_func <em>now</em>"
        );
    }

    #[test]
    fn test_emphasis_nests_inside_earlier_tags() {
        assert_eq!(
            format_inline("***bold** and italic*"),
            "<strong>*bold</strong> and italic*"
        );
        assert_eq!(
            format_inline("**a *b* c**"),
            "<strong>a <em>b</em> c</strong>"
        );
    }

    #[test]
    fn test_no_match_across_lines() {
        assert_eq!(format_inline("*open\nclose*"), "*open\nclose*");
    }

    #[test]
    fn test_unmatched_delimiters_stay_literal() {
        assert_eq!(format_inline("**half"), "**half");
        assert_eq!(format_inline("~~"), "~~");
    }

    #[test]
    fn test_emphasis_stays_inside_table_cell() {
        assert_eq!(
            format_inline("<tr><td>*a</td><td>b*</td><td>*c*</td></tr>"),
            "<tr><td>*a</td><td>b*</td><td><em>c</em></td></tr>"
        );
    }

    #[test]
    fn test_link_stays_inside_table_cell() {
        assert_eq!(
            format_inline("<tr><th>[a</th><th>b](c)</th><th>![x](y.png)</th></tr>"),
            "<tr><th>[a</th><th>b](c)</th><th>\
             <img src=\"y.png\" alt=\"x\" style=\"max-width:100%\"></th></tr>"
        );
    }

    #[test]
    fn test_thematic_break_untouched() {
        assert_eq!(format_inline("***"), "***");
        assert_eq!(format_inline("---"), "---");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            format_inline("![Alt text](image.png)"),
            "<img src=\"image.png\" alt=\"Alt text\" style=\"max-width:100%\">"
        );
    }

    #[test]
    fn test_image_is_not_a_link() {
        let result = format_inline("see ![logo](a.png) here");
        assert!(result.contains("<img src=\"a.png\" alt=\"logo\""));
        assert!(!result.contains("<a "));
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert_eq!(
            format_inline("![](pic.jpg)"),
            "<img src=\"pic.jpg\" alt=\"\" style=\"max-width:100%\">"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            format_inline("[Google](https://google.com)"),
            "<a href=\"https://google.com\" target=\"_blank\">Google</a>"
        );
    }

    #[test]
    fn test_link_with_underscored_url() {
        assert_eq!(
            format_inline("[doc](http://x.org/my_file_name.md)"),
            "<a href=\"http://x.org/my_file_name.md\" target=\"_blank\">doc</a>"
        );
    }

    #[test]
    fn test_emphasis_delimiters_in_targets_stay_literal() {
        assert_eq!(
            format_inline("[py](https://x.org/pkg/__init__.py) and __bold__"),
            "<a href=\"https://x.org/pkg/__init__.py\" target=\"_blank\">py</a> \
             and <strong>bold</strong>"
        );
        assert_eq!(
            format_inline("![a](/img/_thumb_.png)"),
            "<img src=\"/img/_thumb_.png\" alt=\"a\" style=\"max-width:100%\">"
        );
        assert_eq!(
            format_inline("*[x](a*b)*"),
            "<em><a href=\"a*b\" target=\"_blank\">x</a></em>"
        );
    }

    #[test]
    fn test_link_label_with_emphasis() {
        assert_eq!(
            format_inline("[**bold** link](u)"),
            "<a href=\"u\" target=\"_blank\"><strong>bold</strong> link</a>"
        );
    }

    #[test]
    fn test_bracket_text_without_url() {
        assert_eq!(format_inline("[a] [b](c)"), "[a] <a href=\"c\" target=\"_blank\">b</a>");
        assert_eq!(format_inline("[x]()"), "[x]()");
    }

    #[test]
    fn test_quote_in_url_is_escaped() {
        assert_eq!(
            format_inline("[x](a\"b)"),
            "<a href=\"a&quot;b\" target=\"_blank\">x</a>"
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            format_inline("שלום *עולם* ✓"),
            "שלום <em>עולם</em> ✓"
        );
    }
}
