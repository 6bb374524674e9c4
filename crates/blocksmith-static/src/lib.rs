//! Static page generator for blocksmith.
//!
//! Renders one self-contained HTML page per block record and writes them into
//! a `block/<n>/index.html` tree, plus optional raw text, index and sitemap
//! outputs.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
