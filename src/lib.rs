//! Markdown-to-HTML conversion for imported knowledge-base articles
//!
//! The renderer is a fixed sequence of rewrite stages over the escaped input.
//! It never fails: anything it does not recognise ends up as escaped text in a
//! paragraph.

pub mod ast;
pub mod error;
pub mod escape;
pub mod html;
pub mod import;
pub mod metadata;
pub mod parser;
pub mod renderer;
pub mod stages;

pub use error::{ImportError, Result};
pub use import::{ImportFormat, ImportedArticle, import_bytes, import_file};
pub use metadata::{Metadata, extract_metadata};
pub use renderer::Renderer;

/// Render markdown text to HTML
pub fn render(markdown: &str) -> String {
    Renderer::new().render(markdown)
}
