//! Write a default site configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'blocksmith build' to generate the block pages.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# blocksmith configuration

[site]
# Used in page titles and the header link
name = "Machine Time"

# Absolute URL for the crawlable index and sitemap
url = "https://machinetime.xyz"

[paths]
# Base directory for the paths below
root = "."

# Block records (JSON, or YAML for .yaml/.yml files)
data = "blocks.json"

# Page whose first <style> block is reused
style_source = "index.html"

# Block pages are written to <output>/<n>/index.html
output = "block"

[build]
# Minify the shared stylesheet
minify_css = false

# Write raw/<n>.txt
raw = false

# Write index/index.html
index = false

# Write sitemap.xml
sitemap = false
"#;
