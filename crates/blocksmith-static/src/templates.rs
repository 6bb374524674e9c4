//! Template engine for rendering block pages.

use minijinja::{context, AutoEscape, Environment};

use blocksmith_data::Record;

use crate::assets::AssetPipeline;

/// A previous/next navigation link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NavLink {
    /// URL path
    pub href: String,
    /// Whether the button is rendered disabled
    pub disabled: bool,
}

/// Everything needed to render one block page.
///
/// Text fields hold the raw record values; escaping happens in the template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockPage {
    pub site_name: String,
    pub style: String,
    pub n: u64,
    pub total: u64,
    pub page_title: String,
    pub description: String,
    pub canonical: String,
    pub title: String,
    pub body: String,
    /// Empty when the record's part is blank
    pub part: String,
    /// Empty when the record's chapter is blank
    pub chapter: String,
    pub prev: NavLink,
    pub next: NavLink,
}

impl BlockPage {
    /// Build the page for `record`, whose coerced identifier is `n`.
    pub fn new(site_name: &str, style: &str, record: &Record, n: u64, total: u64) -> Self {
        let page_title = format!("{site_name} — Block {n}");
        let description = match record.title.trim() {
            "" => page_title.clone(),
            title => title.to_owned(),
        };

        Self {
            site_name: site_name.to_owned(),
            style: style.to_owned(),
            n,
            total,
            page_title,
            description,
            canonical: block_path(n),
            title: record.title.clone(),
            body: record.body.clone(),
            part: non_blank(&record.part),
            chapter: non_blank(&record.chapter),
            prev: NavLink {
                href: block_path(n.saturating_sub(1).max(1)),
                disabled: n == 1,
            },
            next: NavLink {
                href: block_path(total.min(n + 1)),
                disabled: n == total,
            },
        }
    }
}

/// One row of the crawlable index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexEntry {
    pub n: u64,
    pub title: String,
}

/// Context for the crawlable index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexPage {
    pub site_name: String,
    /// Absolute site URL without a trailing slash
    pub site_url: String,
    pub total: u64,
    pub entries: Vec<IndexEntry>,
    /// Link each entry to its raw text file
    pub raw: bool,
}

/// Site path of a block page.
pub fn block_path(n: u64) -> String {
    format!("/block/{n}/")
}

fn non_blank(s: &str) -> String {
    if s.trim().is_empty() {
        String::new()
    } else {
        s.to_owned()
    }
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turn every line break (`\r\n`, `\n` or a lone `\r`) into a `<br>` tag.
pub fn nl2br(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("<br>\n");
            }
            '\n' => out.push_str("<br>\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Escaping is explicit through the `html` filter so the extracted
        // stylesheet and script pass through untouched.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.add_filter("html", escape_html);
        env.add_filter("nl2br", nl2br);

        env.add_template("block.html", BLOCK_TEMPLATE)
            .expect("Failed to add block template");

        env.add_template("index.html", INDEX_TEMPLATE)
            .expect("Failed to add index template");

        Self { env }
    }

    /// Render a block page.
    pub fn render_block(&self, page: &BlockPage) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("block.html")?;

        tmpl.render(context! {
            page => page,
            script => AssetPipeline::page_script(),
        })
    }

    /// Render the crawlable index page.
    pub fn render_index(&self, page: &IndexPage) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            page => page,
            style => AssetPipeline::index_css(),
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BLOCK_TEMPLATE: &str = r##"<!doctype html>
<html lang="en" data-theme="dark">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{ page.page_title | html }}</title>

  <meta name="description" content="{{ page.description | html }}" />
  <link rel="canonical" href="{{ page.canonical }}" />

  <style>
{{ page.style }}
  </style>
</head>

<body>
  <div class="wrap">
    <div class="topBar">
      <a class="titleLink" href="/#index">{{ page.site_name | upper | html }}</a>
      <a class="aboutBtn" href="/#about" style="display:inline-block;">About</a>
    </div>
    <div class="rule"></div>

    <div class="block" id="blockView">
      <div class="blockMeta">
        Block {{ page.n }}{% if page.part %} • {{ page.part | html }}{% endif %}{% if page.chapter %} • {{ page.chapter | html }}{% endif %}
      </div>

      <div class="blockTitle">{{ page.title | html }}</div>
      <div class="blockBody">{{ page.body | html | nl2br }}</div>
    </div>
  </div>

  <div class="navBar">
    <div class="navInner">
      <div class="nav">
        <a href="/#index" style="text-decoration:none;">
          <button type="button">Index</button>
        </a>

        <a href="{{ page.prev.href }}" style="text-decoration:none;">
          <button type="button" {% if page.prev.disabled %}disabled{% endif %}>← Prev</button>
        </a>

        <a href="{{ page.next.href }}" style="text-decoration:none;">
          <button type="button" {% if page.next.disabled %}disabled{% endif %}>Next →</button>
        </a>

        <button id="themeBtn" title="Toggle light/dark">◐</button>

        <button id="shareBtn" title="Copy/share link">Share</button>

        <div class="counter">Block {{ page.n }} / {{ page.total }}</div>
      </div>
    </div>
  </div>

  <script>
{{ script }}
  </script>
</body>
</html>
"##;

const INDEX_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{ page.site_name | html }} — Index</title>
  <meta name="description" content="{{ page.site_name | html }} — crawlable index of all blocks." />
  <link rel="canonical" href="{{ page.site_url }}/index/" />

  <style>
{{ style }}
  </style>
</head>
<body>
  <h1>{{ page.site_name | html }}</h1>
  <div class="meta">{{ page.total }} blocks • canonical list for crawlers and agents</div>
  <ul>
{% for entry in page.entries %}<li>
  <a class="n" href="{{ page.site_url }}/block/{{ entry.n }}/">Block {{ entry.n }}</a>
  <span class="t">{{ entry.title | html }}</span>
{% if page.raw %}  <a class="raw" href="{{ page.site_url }}/raw/{{ entry.n }}.txt">raw</a>
{% endif %}</li>
{% endfor %}  </ul>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, body: &str) -> Record {
        Record {
            title: title.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    fn render(record: &Record, n: u64, total: u64) -> String {
        let page = BlockPage::new("Machine Time", "body { margin: 0; }", record, n, total);
        TemplateEngine::new().render_block(&page).unwrap()
    }

    #[test]
    fn renders_basic_page() {
        let html = render(&record("Hello", "World"), 2, 3);

        assert!(html.starts_with("<!doctype html>\n"));
        assert!(html.ends_with("</html>\n"));
        assert!(html.contains("<title>Machine Time — Block 2</title>"));
        assert!(html.contains(r#"<meta name="description" content="Hello" />"#));
        assert!(html.contains(r#"<link rel="canonical" href="/block/2/" />"#));
        assert!(html.contains("<style>\nbody { margin: 0; }\n  </style>"));
        assert!(html.contains(r#"<a class="titleLink" href="/#index">MACHINE TIME</a>"#));
        assert!(html.contains(r#"<div class="blockTitle">Hello</div>"#));
        assert!(html.contains(r#"<div class="blockBody">World</div>"#));
        assert!(html.contains(r#"<div class="counter">Block 2 / 3</div>"#));
        assert!(html.contains(r#"localStorage.getItem("mt_theme")"#));
    }

    #[test]
    fn description_falls_back_to_page_title() {
        let html = render(&record("   ", ""), 5, 9);

        assert!(html.contains(r#"content="Machine Time — Block 5""#));
    }

    #[test]
    fn description_is_trimmed_title() {
        let html = render(&record("  Spaced  ", ""), 1, 1);

        assert!(html.contains(r#"content="Spaced""#));
    }

    #[test]
    fn escapes_user_text() {
        let html = render(&record("<script>alert('x')</script>", "a & b"), 1, 1);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn body_line_breaks_become_tags() {
        let body = "one\ntwo\r\nthree\rfour\n";
        let html = render(&record("", body), 1, 1);

        let start = html.find(r#"<div class="blockBody">"#).unwrap();
        let end = start + html[start..].find("</div>").unwrap();
        let rendered = &html[start..end];

        assert_eq!(rendered.matches("<br>").count(), 4);
        assert!(rendered.contains("one<br>\ntwo<br>\nthree<br>\nfour<br>\n"));
    }

    #[test]
    fn meta_line_includes_part_and_chapter() {
        let rec = Record {
            part: "Part I".to_string(),
            chapter: "Dawn & Dusk".to_string(),
            ..Default::default()
        };

        let html = render(&rec, 4, 10);

        assert!(html.contains("Block 4 • Part I • Dawn &amp; Dusk\n"));
    }

    #[test]
    fn meta_line_omits_blank_part() {
        let rec = Record {
            part: "   ".to_string(),
            chapter: "Ch".to_string(),
            ..Default::default()
        };

        let html = render(&rec, 4, 10);

        assert!(html.contains("        Block 4 • Ch\n"));
    }

    #[test]
    fn navigation_is_clamped() {
        let rec = Record::default();

        let first = BlockPage::new("S", "", &rec, 1, 3);
        assert_eq!(first.prev, NavLink { href: "/block/1/".to_string(), disabled: true });
        assert_eq!(first.next, NavLink { href: "/block/2/".to_string(), disabled: false });

        let last = BlockPage::new("S", "", &rec, 3, 3);
        assert_eq!(last.prev, NavLink { href: "/block/2/".to_string(), disabled: false });
        assert_eq!(last.next, NavLink { href: "/block/3/".to_string(), disabled: true });
    }

    #[test]
    fn disabled_flags_follow_position() {
        let rec = Record::default();
        let total = 6;

        for n in 1..=total {
            let page = BlockPage::new("S", "", &rec, n, total);
            assert_eq!(page.prev.disabled, n == 1, "prev of {n}");
            assert_eq!(page.next.disabled, n == total, "next of {n}");
        }
    }

    #[test]
    fn renders_disabled_buttons() {
        let html = render(&Record::default(), 1, 1);

        assert!(html.contains(r#"<button type="button" disabled>← Prev</button>"#));
        assert!(html.contains(r#"<button type="button" disabled>Next →</button>"#));

        let html = render(&Record::default(), 2, 3);

        assert!(html.contains(r#"<button type="button" >← Prev</button>"#));
        assert!(html.contains(r#"<button type="button" >Next →</button>"#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let rec = record("Same", "text\nhere");

        assert_eq!(render(&rec, 2, 4), render(&rec, 2, 4));
    }

    #[test]
    fn renders_index_page() {
        let page = IndexPage {
            site_name: "Machine Time".to_string(),
            site_url: "https://example.com".to_string(),
            total: 2,
            entries: vec![
                IndexEntry { n: 1, title: "A <b>".to_string() },
                IndexEntry { n: 2, title: "B".to_string() },
            ],
            raw: true,
        };

        let html = TemplateEngine::new().render_index(&page).unwrap();

        assert!(html.contains(r#"href="https://example.com/block/1/">Block 1</a>"#));
        assert!(html.contains(r#"<span class="t">A &lt;b&gt;</span>"#));
        assert!(html.contains(r#"href="https://example.com/raw/2.txt">raw</a>"#));
        assert!(html.contains("2 blocks • canonical list"));
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn index_without_raw_links() {
        let page = IndexPage {
            site_name: "S".to_string(),
            site_url: "https://example.com".to_string(),
            total: 1,
            entries: vec![IndexEntry { n: 1, title: "A".to_string() }],
            raw: false,
        };

        let html = TemplateEngine::new().render_index(&page).unwrap();

        assert!(!html.contains("raw/1.txt"));
    }

    #[test]
    fn escape_matches_html_rules() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
        assert_eq!(nl2br("a\r\n\nb"), "a<br>\n<br>\nb");
    }
}
