//! Stylesheet extraction from the site's main page.

use std::fs;
use std::path::{Path, PathBuf};

const STYLE_OPEN: &str = "<style>";
const STYLE_CLOSE: &str = "</style>";

/// Errors that can occur when extracting the stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Style source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find <style> in style source")]
    MissingOpen,

    #[error("Could not find </style> after <style> in style source")]
    MissingClose,
}

/// Return the text of the first `<style>` block, trimmed.
///
/// Only the first opening and the first closing marker are considered.
pub fn extract_style(html: &str) -> Result<&str, StyleError> {
    let start = html.find(STYLE_OPEN).ok_or(StyleError::MissingOpen)? + STYLE_OPEN.len();
    let end = html.find(STYLE_CLOSE).ok_or(StyleError::MissingClose)?;

    if end < start {
        return Err(StyleError::MissingClose);
    }

    Ok(html[start..end].trim())
}

/// Read `path` and extract its first stylesheet.
pub fn load_style(path: &Path) -> Result<String, StyleError> {
    if !path.exists() {
        return Err(StyleError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let html = fs::read_to_string(path).map_err(|source| StyleError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    extract_style(&html).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_first_style_block() {
        let html = r#"<html><head>
<style>
  body { color: red; }
</style>
<style>.second {}</style>
</head></html>"#;

        assert_eq!(extract_style(html).unwrap(), "body { color: red; }");
    }

    #[test]
    fn empty_style_block() {
        assert_eq!(extract_style("<style>  \n </style>").unwrap(), "");
    }

    #[test]
    fn errors_without_open_marker() {
        let result = extract_style("<html></style></html>");

        assert!(matches!(result, Err(StyleError::MissingOpen)));
    }

    #[test]
    fn errors_without_close_marker() {
        let result = extract_style("<style>body {}");

        assert!(matches!(result, Err(StyleError::MissingClose)));
    }

    #[test]
    fn errors_when_close_precedes_open() {
        let result = extract_style("</style><style>body {}");

        assert!(matches!(result, Err(StyleError::MissingClose)));
    }

    #[test]
    fn reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("index.html");

        assert!(matches!(load_style(&path), Err(StyleError::NotFound { .. })));

        fs::write(&path, "<style>a{}</style>").unwrap();
        assert_eq!(load_style(&path).unwrap(), "a{}");
    }
}
