//! Error types for document import.
//!
//! Rendering itself never fails; these errors come from reading and decoding
//! files before their text reaches the renderer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is not valid text in a supported encoding")]
    Decoding { name: String },

    #[error("unsupported format: .{extension} (expected md, markdown, txt, html, htm or docx)")]
    UnsupportedFormat { extension: String },

    #[error("{name} has no file extension (expected md, markdown, txt, html, htm or docx)")]
    MissingExtension { name: String },

    #[error("{format} import requires an external converter")]
    ConverterUnavailable { format: &'static str },
}

pub type Result<T> = std::result::Result<T, ImportError>;
