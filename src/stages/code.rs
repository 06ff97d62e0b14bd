/// Code stage: fenced blocks and inline code spans
///
/// Code content is swapped for protected-span tokens so the inline and block
/// stages never see it. The surrounding `<pre><code>`/`<code>` tags stay in
/// the text, which lets the paragraph stage recognise code blocks.
use super::ProtectedSpans;
use super::table::cell_limit;
use crate::parser::{find_closing_fence, is_fenced_code_start};

pub fn render_code(text: &str, spans: &mut ProtectedSpans) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_fenced_code_start(line).is_some()
            && let Some(close) = find_closing_fence(&lines[i..])
        {
            // The language token is discarded
            let content = lines[i + 1..i + close].join("\n");
            output.push(render_fenced_block(content, spans));
            i += close + 1;
            continue;
        }

        // An unclosed fence is ordinary text
        output.push(render_code_spans(line, spans));
        i += 1;
    }

    output.join("\n")
}

fn render_fenced_block(content: String, spans: &mut ProtectedSpans) -> String {
    if content.is_empty() {
        return "<pre><code></code></pre>".to_string();
    }
    format!("<pre><code>{}</code></pre>", spans.protect(content))
}

/// Replace `` `code` `` spans on a single line
/// Spans are non-greedy and cannot be empty or contain backticks
pub fn render_code_spans(line: &str, spans: &mut ProtectedSpans) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('`') {
        let after_open = &rest[open + 1..];
        // A span ends inside the table cell it starts in
        let cell = &after_open[..cell_limit(after_open)];
        match cell.find('`') {
            Some(close) if close > 0 => {
                result.push_str(&rest[..open]);
                result.push_str("<code>");
                result.push_str(&spans.protect(after_open[..close].to_string()));
                result.push_str("</code>");
                rest = &after_open[close + 1..];
            }
            // Empty or unclosed span, the next backtick may open another one
            _ => {
                result.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}
