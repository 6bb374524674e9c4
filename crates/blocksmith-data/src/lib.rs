//! Input side of blocksmith.
//!
//! Loads block records from a JSON or YAML data file and pulls the embedded
//! stylesheet out of the site's main page so generated pages match it.

pub mod loader;
pub mod record;
pub mod style;

pub use loader::{load_records, parse_records, DataFormat, LoadError};
pub use record::{BlockId, Record};
pub use style::{extract_style, load_style, StyleError};
