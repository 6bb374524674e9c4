//! Static block page builder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use blocksmith_data::{load_records, load_style, LoadError, Record, StyleError};

use crate::assets::AssetPipeline;
use crate::templates::{block_path, escape_html, BlockPage, IndexEntry, IndexPage, TemplateEngine};

/// Configuration for building the block pages.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site root; raw files, the index page and the sitemap go here
    pub root: PathBuf,

    /// Data file holding the block records
    pub data_path: PathBuf,

    /// Main page whose first stylesheet is reused
    pub style_source: PathBuf,

    /// Directory receiving `<n>/index.html`
    pub output_dir: PathBuf,

    /// Site name used in titles
    pub site_name: String,

    /// Absolute site URL for the index page and sitemap
    pub site_url: String,

    /// Minify the extracted stylesheet
    pub minify_css: bool,

    /// Write `raw/<n>.txt`
    pub raw: bool,

    /// Write `index/index.html`
    pub index: bool,

    /// Write `sitemap.xml`
    pub sitemap: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            data_path: PathBuf::from("blocks.json"),
            style_source: PathBuf::from("index.html"),
            output_dir: PathBuf::from("block"),
            site_name: "Machine Time".to_string(),
            site_url: "https://machinetime.xyz".to_string(),
            minify_css: false,
            raw: false,
            index: false,
            sitemap: false,
        }
    }
}

impl BuildConfig {
    fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }

    fn sitemap_path(&self) -> PathBuf {
        self.root.join("sitemap.xml")
    }

    fn site_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of records in the data file
    pub total: usize,

    /// Number of block pages written
    pub pages: usize,

    /// Records skipped for lack of a usable identifier
    pub skipped: usize,

    /// Raw directory, when raw files were written
    pub raw_dir: Option<PathBuf>,

    /// Index directory, when the index page was written
    pub index_dir: Option<PathBuf>,

    /// URL count of the sitemap, when one was written
    pub sitemap_urls: Option<usize>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildResult {
    /// Human-readable completion report, one entry per line.
    ///
    /// The first line counts every record in the data file, including any
    /// that were skipped.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Built {} block pages into {}/",
            self.total,
            self.output_dir.display()
        )];

        if let Some(dir) = &self.raw_dir {
            lines.push(format!(
                "Built {} raw text files into {}/",
                self.total,
                dir.display()
            ));
        }
        if let Some(dir) = &self.index_dir {
            lines.push(format!("Built crawlable index into {}/", dir.display()));
        }
        if let Some(count) = self.sitemap_urls {
            lines.push(format!("Wrote sitemap.xml with {} URLs", count));
        }

        lines
    }
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Data(#[from] LoadError),

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record that produced a page.
struct Written<'a> {
    n: u64,
    record: &'a Record,
}

/// Static block page builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build every block page, then any enabled extra outputs.
    ///
    /// Inputs are fully loaded before anything is written, so a missing or
    /// malformed input leaves the output tree untouched.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let style = self.load_style()?;
        let records = load_records(&self.config.data_path)?;
        let total = records.len();

        create_dir(&self.config.output_dir)?;

        let mut written = Vec::with_capacity(total);
        for record in &records {
            let Some(n) = record.id() else {
                tracing::debug!("Skipping record without a usable identifier: {:?}", record.n);
                continue;
            };

            let page = BlockPage::new(&self.config.site_name, &style, record, n, total as u64);
            let html = self
                .templates
                .render_block(&page)
                .map_err(|e| BuildError::Template(e.to_string()))?;

            self.write_page(n, &html)?;
            written.push(Written { n, record });
        }

        let raw_dir = if self.config.raw {
            Some(self.generate_raw(&written)?)
        } else {
            None
        };

        let index_dir = if self.config.index {
            Some(self.generate_index(&written, total)?)
        } else {
            None
        };

        let sitemap_urls = if self.config.sitemap {
            Some(self.generate_sitemap(&written)?)
        } else {
            None
        };

        let duration = start.elapsed();

        Ok(BuildResult {
            total,
            pages: written.len(),
            skipped: total - written.len(),
            raw_dir,
            index_dir,
            sitemap_urls,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Write a rendered page to `<output>/<n>/index.html`, replacing any
    /// existing file.
    pub fn write_page(&self, n: u64, html: &str) -> Result<PathBuf, BuildError> {
        let dir = self.config.output_dir.join(n.to_string());
        create_dir(&dir)?;

        let path = dir.join("index.html");
        write_file(&path, html)?;

        Ok(path)
    }

    /// Read the shared stylesheet, minifying it when configured.
    fn load_style(&self) -> Result<String, BuildError> {
        let css = load_style(&self.config.style_source)?;

        if !self.config.minify_css {
            return Ok(css);
        }

        match AssetPipeline::minify_css(&css) {
            Ok(minified) => Ok(minified),
            Err(e) => {
                tracing::warn!("Using unminified stylesheet: {}", e);
                Ok(css)
            }
        }
    }

    /// Write `raw/<n>.txt` for every page: title, blank line, body.
    fn generate_raw(&self, written: &[Written<'_>]) -> Result<PathBuf, BuildError> {
        let raw_dir = self.config.raw_dir();
        create_dir(&raw_dir)?;

        for page in written {
            let text = format!("{}\n\n{}\n", page.record.title, page.record.body);
            write_file(&raw_dir.join(format!("{}.txt", page.n)), &text)?;
        }

        Ok(raw_dir)
    }

    /// Write the crawlable index page.
    fn generate_index(&self, written: &[Written<'_>], total: usize) -> Result<PathBuf, BuildError> {
        let index_dir = self.config.index_dir();
        create_dir(&index_dir)?;

        let page = IndexPage {
            site_name: self.config.site_name.clone(),
            site_url: self.config.site_url().to_string(),
            total: total as u64,
            entries: written
                .iter()
                .map(|w| IndexEntry {
                    n: w.n,
                    title: w.record.title.clone(),
                })
                .collect(),
            raw: self.config.raw,
        };

        let html = self
            .templates
            .render_index(&page)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        write_file(&index_dir.join("index.html"), &html)?;

        Ok(index_dir)
    }

    /// Write `sitemap.xml` and return the number of URLs it lists.
    fn generate_sitemap(&self, written: &[Written<'_>]) -> Result<usize, BuildError> {
        let site = self.config.site_url();

        // Records sharing an id wrote the same page; list it once
        let mut seen = HashSet::new();
        let ids: Vec<u64> = written.iter().map(|w| w.n).filter(|n| seen.insert(*n)).collect();

        let mut urls = vec![format!("{}/", site)];
        if self.config.index {
            urls.push(format!("{}/index/", site));
        }
        urls.extend(ids.iter().map(|n| format!("{}{}", site, block_path(*n))));
        if self.config.raw {
            urls.extend(ids.iter().map(|n| format!("{}/raw/{}.txt", site, n)));
        }

        let entries: Vec<String> = urls
            .iter()
            .map(|u| format!("  <url><loc>{}</loc></url>", escape_html(u)))
            .collect();

        let sitemap = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             {}\n\
             </urlset>\n",
            entries.join("\n")
        );

        write_file(&self.config.sitemap_path(), &sitemap)?;

        Ok(urls.len())
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}
