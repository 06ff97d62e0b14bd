/// Transient structures recognised while rewriting a document
use serde::{Deserialize, Serialize};

/// Column alignment taken from a table separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
}

impl Alignment {
    /// Derive the alignment of one separator cell (`:---`, `---:`, `:---:`, `---`)
    pub fn from_separator(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            (true, false) => Alignment::Left,
            (false, false) => Alignment::None,
        }
    }

    /// CSS value for `text-align`, or `None` when no style should be emitted
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Right => Some("right"),
            Alignment::Center => Some("center"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    /// One entry per separator cell, read positionally against `headers`
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Alignment for a column; columns without a separator cell are unaligned
    pub fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Contiguous same-kind list items, rendered as one list element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRun {
    pub kind: ListKind,
    pub items: Vec<String>,
}

impl ListRun {
    pub fn new(kind: ListKind) -> Self {
        ListRun {
            kind,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Always within 1..=6
    pub level: u8,
    pub text: String,
}
