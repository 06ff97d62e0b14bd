//! Document import: turn an uploaded file into article fields.
//!
//! The file extension selects the importer. Markdown goes through the
//! renderer; HTML is parsed and its content re-serialized; DOCX needs an external converter and
//! is rejected here.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::html;
use crate::metadata::{SUMMARY_MAX_CHARS, extract_metadata, truncate_chars};
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Markdown,
    Html,
    Docx,
}

impl ImportFormat {
    /// Pick the format from a file name's extension, ignoring case
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = match name.rsplit_once('.') {
            Some((_, extension)) if !extension.is_empty() => extension.to_ascii_lowercase(),
            _ => {
                return Err(ImportError::MissingExtension {
                    name: name.to_string(),
                });
            }
        };
        match extension.as_str() {
            "md" | "markdown" | "txt" => Ok(ImportFormat::Markdown),
            "html" | "htm" => Ok(ImportFormat::Html),
            "docx" => Ok(ImportFormat::Docx),
            _ => Err(ImportError::UnsupportedFormat { extension }),
        }
    }
}

/// The fields an import fills into the article editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedArticle {
    pub title: String,
    pub summary: String,
    pub html: String,
    pub format: ImportFormat,
}

/// Read a file from disk and import it
pub fn import_file(path: impl AsRef<Path>) -> Result<ImportedArticle> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    import_bytes(&name, &bytes)
}

/// Import the contents of an uploaded file
pub fn import_bytes(file_name: &str, bytes: &[u8]) -> Result<ImportedArticle> {
    let format = ImportFormat::from_file_name(file_name)?;
    tracing::debug!(file = file_name, ?format, size = bytes.len(), "Importing document");

    match format {
        ImportFormat::Markdown => {
            let text = decode_text(file_name, bytes)?;
            Ok(import_markdown(file_name, &text))
        }
        ImportFormat::Html => {
            let text = decode_text(file_name, bytes)?;
            Ok(import_html(file_name, &text))
        }
        ImportFormat::Docx => Err(ImportError::ConverterUnavailable { format: "docx" }),
    }
}

/// Decode file bytes as text
///
/// A byte order mark selects UTF-8 or UTF-16; anything else must be valid UTF-8.
pub fn decode_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let (text, malformed) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if malformed {
        return Err(ImportError::Decoding {
            name: file_name.to_string(),
        });
    }
    Ok(text.into_owned())
}

pub fn import_markdown(file_name: &str, markdown: &str) -> ImportedArticle {
    let html = Renderer::new().render(markdown);
    let metadata = extract_metadata(markdown);

    let title = metadata.title.unwrap_or_else(|| {
        tracing::debug!(file = file_name, "No heading found, using file name as title");
        file_stem(file_name).to_string()
    });

    ImportedArticle {
        title,
        summary: metadata.summary,
        html,
        format: ImportFormat::Markdown,
    }
}

/// Take the main content of an HTML document
///
/// Content is the inner HTML of `<main>`, else `<body>`. The title comes from
/// the first `<h1>`, then `<title>`, then the file name; the summary is the
/// visible text of `<body>`.
pub fn import_html(file_name: &str, source: &str) -> ImportedArticle {
    let document = html::parse_html(source);
    let body = html::find_first_element(&document, "body");
    let content = html::find_first_element(&document, "main")
        .or_else(|| body.clone())
        .map(|region| html::inner_html(&region))
        .unwrap_or_default();

    let title = ["h1", "title"]
        .into_iter()
        .filter_map(|tag| html::find_first_element(&document, tag))
        .map(|element| html::text_content(&element))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| {
            tracing::debug!(file = file_name, "No title element, using file name as title");
            file_stem(file_name).to_string()
        });

    let text = html::text_content(body.as_ref().unwrap_or(&document));
    let summary = truncate_chars(&text, SUMMARY_MAX_CHARS);

    ImportedArticle {
        title,
        summary,
        html: content.trim().to_string(),
        format: ImportFormat::Html,
    }
}

/// File name without its last extension
fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
