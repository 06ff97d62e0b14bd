use std::fs;

use kbmark::{ImportError, ImportFormat, import_bytes, import_file};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn imports_markdown_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.md");
    fs::write(&path, "# Test Title\n\nThis is the first paragraph.\n").unwrap();

    let article = import_file(&path).unwrap();
    assert_eq!(article.title, "Test Title");
    assert_eq!(article.summary, "This is the first paragraph.");
    assert_eq!(article.format, ImportFormat::Markdown);
    assert!(article.html.contains("<h1>Test Title</h1>"));
}

#[test]
fn title_falls_back_to_file_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("my-document.txt");
    fs::write(&path, "No heading in this one.").unwrap();

    let article = import_file(&path).unwrap();
    assert_eq!(article.title, "my-document");
}

#[test]
fn imports_html_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page.HTML");
    fs::write(
        &path,
        "<html><head><title>Page</title></head><body><h1>Main Heading</h1><p>Body text</p></body></html>",
    )
    .unwrap();

    let article = import_file(&path).unwrap();
    assert_eq!(article.title, "Main Heading");
    assert_eq!(article.html, "<h1>Main Heading</h1><p>Body text</p>");
    assert_eq!(article.summary, "Main Heading Body text");
    assert_eq!(article.format, ImportFormat::Html);
}

#[test]
fn rejects_unsupported_file() {
    let err = import_bytes("test.pdf", b"%PDF-1.7").unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat { .. }));
}

#[test]
fn rejects_undecodable_markdown() {
    let err = import_bytes("broken.md", &[b'#', b' ', 0xC3, 0x28]).unwrap_err();
    assert!(matches!(err, ImportError::Decoding { .. }));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.md");

    let err = import_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::Io { .. }));
    assert!(err.to_string().contains("absent.md"));
}

#[test]
fn article_serializes_to_json() {
    let article = import_bytes("note.md", b"# Hi\n\nthere").unwrap();
    let json = serde_json::to_value(&article).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "title": "Hi",
            "summary": "there",
            "html": "<h1>Hi</h1>\n<p>there</p>",
            "format": "markdown"
        })
    );
}

#[test]
fn html_comments_are_not_content() {
    let article = import_bytes(
        "p.html",
        b"<body><!-- <h1>Draft</h1> --><h1>Caf&eacute; &#8212; Real</h1><p>x</p></body>",
    )
    .unwrap();
    assert_eq!(article.title, "Caf\u{e9} \u{2014} Real");
    assert_eq!(article.summary, "Caf\u{e9} \u{2014} Real x");
}

#[test]
fn rejects_file_without_extension() {
    let err = import_bytes("README", b"# Readme").unwrap_err();
    assert!(matches!(err, ImportError::MissingExtension { .. }));
    assert!(!err.to_string().contains(".readme"));
}
