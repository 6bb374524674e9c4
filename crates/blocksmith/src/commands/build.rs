//! Block page build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blocksmith_static::{BuildConfig, StaticBuilder};
use serde::Deserialize;

/// Command line overrides for the build.
#[derive(Debug, Default, clap::Args)]
pub struct BuildArgs {
    /// Site root (defaults to config or ".")
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory for block pages (defaults to config or "<root>/block")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minify the shared stylesheet
    #[arg(long)]
    pub minify: bool,
}

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    site: SiteConfig,
    paths: PathsConfig,
    build: BuildSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SiteConfig {
    name: String,
    url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Machine Time".to_string(),
            url: "https://machinetime.xyz".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PathsConfig {
    root: PathBuf,
    data: PathBuf,
    style_source: PathBuf,
    output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            data: PathBuf::from("blocks.json"),
            style_source: PathBuf::from("index.html"),
            output: PathBuf::from("block"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildSettings {
    minify_css: bool,
    raw: bool,
    index: bool,
    sitemap: bool,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

/// Merge the config file with command line overrides.
fn resolve(file: ConfigFile, args: &BuildArgs) -> BuildConfig {
    let root = args.root.clone().unwrap_or(file.paths.root);
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| root.join(&file.paths.output));

    BuildConfig {
        data_path: root.join(&file.paths.data),
        style_source: root.join(&file.paths.style_source),
        output_dir,
        root,
        site_name: file.site.name,
        site_url: file.site.url,
        minify_css: args.minify || file.build.minify_css,
        raw: file.build.raw,
        index: file.build.index,
        sitemap: file.build.sitemap,
    }
}

/// Run the build command.
pub fn run(config_path: &Path, args: &BuildArgs) -> Result<()> {
    tracing::debug!("Building block pages...");

    let config = resolve(load_config(config_path)?, args);
    let result = StaticBuilder::new(config)
        .build()
        .context("Failed to build block pages")?;

    for line in result.summary() {
        println!("{line}");
    }

    tracing::info!(
        "Wrote {} pages ({} skipped) in {}ms",
        result.pages,
        result.skipped,
        result.duration_ms
    );

    Ok(())
}
