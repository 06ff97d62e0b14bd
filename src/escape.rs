//! HTML escaping for raw input and attribute values.

/// Escape `&`, `<` and `>` as HTML entities, leaving everything else untouched.
///
/// This runs once over the raw document before any stage injects markup.
///
/// # Examples
///
/// ```
/// use kbmark::escape::escape_html;
///
/// assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
/// assert_eq!(escape_html(""), "");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Make already-escaped text safe inside a double-quoted attribute.
pub fn escape_attribute(text: &str) -> String {
    text.replace('"', "&quot;")
}

/// Remove markup inserted by earlier stages, keeping only the text.
///
/// Used for attribute values such as `alt`, where nested tags would break the
/// element. Input is assumed to be escaped, so every `<` starts a tag.
pub fn strip_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}
