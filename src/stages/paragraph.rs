//! Paragraph stage: wrap loose lines in `<p>` and clean up artifacts.

const BLOCK_TAGS: [&str; 14] = [
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "pre",
    "blockquote",
    "hr",
    "p",
    "table",
];

/// Block elements a stray paragraph must never wrap
const UNWRAP_TAGS: [&str; 11] = [
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "blockquote",
    "pre",
    "table",
];

pub fn wrap_paragraphs(text: &str) -> String {
    let html = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if starts_with_block_tag(line) {
                line.to_string()
            } else {
                format!("<p>{line}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    cleanup(&html)
}

/// Check whether a line opens with one of the block-level tags
pub fn starts_with_block_tag(line: &str) -> bool {
    let Some(after) = line.strip_prefix('<') else {
        return false;
    };
    let name_len = after
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    let name = &after[..name_len];
    let terminated = after[name_len..].starts_with(['>', ' ', '/']);
    terminated && BLOCK_TAGS.contains(&name)
}

/// Remove empty paragraphs and paragraphs wrapped around block elements
pub fn cleanup(html: &str) -> String {
    let mut html = html.replace("<p></p>", "").replace("<p><hr></p>", "<hr>");
    for tag in UNWRAP_TAGS {
        html = html
            .replace(&format!("<p><{tag}>"), &format!("<{tag}>"))
            .replace(&format!("</{tag}></p>"), &format!("</{tag}>"));
    }
    html
}
