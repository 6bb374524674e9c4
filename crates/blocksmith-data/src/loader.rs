//! Record collection loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::record::Record;

/// Serialization format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// Pick the format from a file extension. Anything that is not YAML is
    /// read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Errors that can occur when loading records.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("{} contains no records", path.display())]
    Empty { path: PathBuf },
}

/// Load the record collection from `path`.
///
/// The file must hold a single non-empty list of records.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&source, DataFormat::from_path(path), path)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

/// Parse a record collection from text read from `path`.
///
/// `path` is only used to name the source in errors.
pub fn parse_records(
    source: &str,
    format: DataFormat,
    path: &Path,
) -> Result<Vec<Record>, LoadError> {
    let malformed = |message: String| LoadError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let records: Vec<Record> = match format {
        DataFormat::Json => serde_json::from_str(source).map_err(|e| malformed(e.to_string()))?,
        DataFormat::Yaml => serde_yaml::from_str(source).map_err(|e| malformed(e.to_string()))?,
    };

    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(records)
}
