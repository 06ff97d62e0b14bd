//! The ordered rewrite stages.
//!
//! Each stage takes the text produced by the previous one and replaces the
//! spans it recognises with HTML. The order is fixed by [`PIPELINE`]: escaping
//! first, then tables, code, inline formatting, block structures, and finally
//! paragraph wrapping. Code content is moved out of the text by the code stage
//! and put back only after the last stage has run.

pub mod block;
pub mod code;
pub mod inline;
pub mod paragraph;
pub mod table;

use crate::escape::escape_html;

/// Marks the start of a protected-span token
const TOKEN_OPEN: char = '\u{E000}';
/// Marks the end of a protected-span token
const TOKEN_CLOSE: char = '\u{E001}';

/// Dropped from input: carriage returns and every token marker
const RESERVED_CHARS: [char; 5] = [
    '\r',
    TOKEN_OPEN,
    TOKEN_CLOSE,
    inline::TARGET_OPEN,
    inline::TARGET_CLOSE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Escape,
    Table,
    Code,
    Inline,
    Block,
    Paragraph,
}

/// Stages in the order they must run
pub const PIPELINE: [Stage; 6] = [
    Stage::Escape,
    Stage::Table,
    Stage::Code,
    Stage::Inline,
    Stage::Block,
    Stage::Paragraph,
];

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Escape => "escape",
            Stage::Table => "table",
            Stage::Code => "code",
            Stage::Inline => "inline",
            Stage::Block => "block",
            Stage::Paragraph => "paragraph",
        }
    }

    pub fn apply(self, doc: &mut Document) {
        match self {
            Stage::Escape => doc.rewrite(escape_html),
            Stage::Table => doc.rewrite(table::render_tables),
            Stage::Code => {
                let text = code::render_code(&doc.text, &mut doc.spans);
                doc.text = text;
            }
            Stage::Inline => doc.rewrite(inline::format_inline),
            Stage::Block => doc.rewrite(block::render_blocks),
            Stage::Paragraph => doc.rewrite(paragraph::wrap_paragraphs),
        }
    }
}

/// HTML fragments hidden from later stages behind opaque tokens
#[derive(Debug, Default)]
pub struct ProtectedSpans {
    spans: Vec<String>,
}

impl ProtectedSpans {
    /// Store a fragment and return the token that stands in for it
    pub fn protect(&mut self, html: String) -> String {
        let index = self.spans.len();
        self.spans.push(html);
        format!("{TOKEN_OPEN}{index}{TOKEN_CLOSE}")
    }

    /// Replace every token in `text` with its stored fragment
    pub fn restore(&self, text: &str) -> String {
        if self.spans.is_empty() {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(TOKEN_OPEN) {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + TOKEN_OPEN.len_utf8()..];
            let Some(end) = after_open.find(TOKEN_CLOSE) else {
                rest = after_open;
                continue;
            };
            if let Some(span) = after_open[..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.spans.get(index))
            {
                result.push_str(span);
            }
            rest = &after_open[end + TOKEN_CLOSE.len_utf8()..];
        }
        result.push_str(rest);
        result
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// The text of one render call as it moves through the stages
#[derive(Debug)]
pub struct Document {
    text: String,
    spans: ProtectedSpans,
}

impl Document {
    /// Normalize line endings and drop characters reserved for tokens
    pub fn new(markdown: &str) -> Self {
        let text = markdown
            .chars()
            .filter(|c| !RESERVED_CHARS.contains(c))
            .collect();
        Document {
            text,
            spans: ProtectedSpans::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn protected_spans(&self) -> usize {
        self.spans.len()
    }

    fn rewrite(&mut self, stage: impl FnOnce(&str) -> String) {
        self.text = stage(&self.text);
    }

    /// Finish the document, putting protected fragments back in place
    pub fn into_html(self) -> String {
        self.spans.restore(&self.text)
    }
}
