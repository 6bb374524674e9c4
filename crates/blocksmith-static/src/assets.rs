//! Fixed script and stylesheet assets embedded in generated pages.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Script embedded in every block page: theme toggle and share button.
    pub fn page_script() -> &'static str {
        PAGE_JS
    }

    /// Stylesheet for the crawlable index page.
    pub fn index_css() -> &'static str {
        INDEX_CSS
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Theme handling mirrors the main site so the choice carries across pages.
const PAGE_JS: &str = r#"    function getTheme() {
      return localStorage.getItem("mt_theme") || "dark";
    }
    function setTheme(t) {
      document.documentElement.setAttribute("data-theme", t);
      localStorage.setItem("mt_theme", t);
    }
    setTheme(getTheme());
    document.getElementById("themeBtn").addEventListener("click", () => {
      const t = getTheme() === "dark" ? "light" : "dark";
      setTheme(t);
    });

    document.getElementById("shareBtn").addEventListener("click", async () => {
      const url = window.location.href;
      try {
        if (navigator.share) {
          await navigator.share({ title: document.title, url });
          return;
        }
      } catch (e) {}

      try {
        await navigator.clipboard.writeText(url);
        const btn = document.getElementById("shareBtn");
        const old = btn.textContent;
        btn.textContent = "Copied";
        setTimeout(() => btn.textContent = old, 900);
      } catch (e) {
        alert(url);
      }
    });"#;

const INDEX_CSS: &str = r#"    :root{ color-scheme: dark light; }

    body{
      margin: 0;
      padding: 40px 18px 80px;
      max-width: 920px;
      margin-inline: auto;
      font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas,
                   "Liberation Mono", "Courier New", monospace;
      line-height: 1.6;
    }

    h1{
      font-size: 20px;
      letter-spacing: .18em;
      text-transform: uppercase;
      margin: 0 0 18px;
    }

    .meta{
      opacity: .75;
      font-size: 13px;
      margin-bottom: 22px;
    }

    ul{
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 10px;
    }

    li{
      border: 1px solid rgba(127,127,127,0.25);
      border-radius: 10px;
      padding: 12px 14px;
      display: grid;
      grid-template-columns: auto 1fr auto;
      gap: 12px;
      align-items: baseline;
    }

    a{
      color: inherit;
      text-decoration: none;
      border-bottom: 1px solid rgba(127,127,127,0.35);
      padding-bottom: 1px;
    }

    a:hover{
      border-bottom-color: rgba(127,127,127,0.75);
    }

    .t{
      opacity: .75;
      font-size: 13px;
    }

    .raw{
      opacity: .75;
      font-size: 12px;
    }"#;
