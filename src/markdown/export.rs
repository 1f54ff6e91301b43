//! Poster export for Markdown documents
//!
//! Renders each page produced by [`paginate`](super::paginate::paginate)
//! into a self-contained HTML poster card with embedded styles and writes
//! the cards to disk one at a time.

use crate::error::{ExportError, ExportResult, FileError};
use crate::file_handler::{ensure_dir, write_file_atomic};
use crate::markdown::paginate::{paginate, RenderMode};
use pulldown_cmark::{html, Options, Parser};
use std::path::{Path, PathBuf};

/// Default output file stem, matching the original download name
pub const DEFAULT_FILE_STEM: &str = "markdown-poster";

/// Options for poster rendering
#[derive(Debug, Clone)]
pub struct PosterOptions {
    /// Document title
    pub title: Option<String>,
    /// Use dark card styling
    pub dark_mode: bool,
    /// Show the "page / total" badge on paginated cards
    pub show_page_badge: bool,
    /// Include the embedded stylesheet
    pub include_styles: bool,
    /// Custom CSS appended after the built-in styles
    pub custom_css: Option<String>,
}

impl Default for PosterOptions {
    fn default() -> Self {
        Self {
            title: None,
            dark_mode: false,
            show_page_badge: true,
            include_styles: true,
            custom_css: None,
        }
    }
}

/// A single rendered poster card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Zero-based position in the page sequence
    pub index: usize,
    /// Number of pages in the sequence
    pub total: usize,
    /// Markdown source of this page
    pub markdown: String,
    /// Complete HTML document for the card
    pub html: String,
}

/// Renders pages to poster cards and writes them to disk
pub struct PosterExporter {
    options: Options,
}

impl PosterExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self { options }
    }

    /// Render markdown to an HTML fragment (no document wrapper)
    pub fn render_fragment(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_content = String::new();
        html::push_html(&mut html_content, parser);
        html_content
    }

    /// Render one page as a complete poster card document.
    ///
    /// A `position` of `None` renders an unnumbered card, as in long mode.
    pub fn render_page(
        &self,
        markdown: &str,
        position: Option<(usize, usize)>,
        options: &PosterOptions,
    ) -> String {
        let body = self.render_fragment(markdown);
        let title = options.title.as_deref().unwrap_or("Markdown Poster");

        let styles = if options.include_styles {
            Self::get_styles(options.dark_mode, options.custom_css.as_deref())
        } else {
            String::new()
        };

        let badge = match position {
            Some((index, total)) if options.show_page_badge => format!(
                "<div class=\"page-badge\">{} / {}</div>",
                index + 1,
                total
            ),
            _ => String::new(),
        };

        let theme_class = if options.dark_mode { "poster dark" } else { "poster" };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="md2poster">
    <title>{}</title>
    {}
</head>
<body>
    <div class="{}">
        <article class="poster-card">
        {}
        {}
        </article>
    </div>
</body>
</html>"#,
            escape_html(title),
            styles,
            theme_class,
            body,
            badge
        )
    }

    /// Paginate `source` and render every page to a poster card
    pub fn render_document(
        &self,
        source: &str,
        mode: RenderMode,
        options: &PosterOptions,
    ) -> Vec<RenderedPage> {
        let pages = paginate(source, mode);
        let total = pages.len();

        pages
            .into_iter()
            .enumerate()
            .map(|(index, markdown)| {
                let position = mode.is_paginated().then_some((index, total));
                let html = self.render_page(&markdown, position, options);
                RenderedPage {
                    index,
                    total,
                    markdown,
                    html,
                }
            })
            .collect()
    }

    /// Render and write every page of `source` into `output_dir`.
    ///
    /// Pages are written sequentially; the first failure aborts the export
    /// and is returned. Page files under the same stem left over from an
    /// earlier, longer export are removed. Returns the written paths in
    /// page order.
    pub async fn export_pages(
        &self,
        source: &str,
        mode: RenderMode,
        output_dir: &Path,
        file_stem: &str,
        options: &PosterOptions,
    ) -> ExportResult<Vec<PathBuf>> {
        if file_stem.is_empty() || file_stem.contains(&['/', '\\'][..]) {
            return Err(ExportError::InvalidFileStem(file_stem.to_string()));
        }

        let rendered = self.render_document(source, mode, options);
        if rendered.is_empty() {
            log::info!("Nothing to export: document has no non-empty pages");
            if output_dir.is_dir() {
                remove_stale_pages(output_dir, file_stem, &[]).await?;
            }
            return Ok(Vec::new());
        }

        ensure_dir(output_dir).await?;

        let mut written = Vec::with_capacity(rendered.len());
        for page in &rendered {
            let path = output_dir.join(page_file_name(file_stem, mode, page.index));
            write_file_atomic(&path, &page.html).await?;
            log::debug!("Wrote page {}/{} to {}", page.index + 1, page.total, path.display());
            written.push(path);
        }

        remove_stale_pages(output_dir, file_stem, &written).await?;

        log::info!(
            "Exported {} poster page(s) to {}",
            written.len(),
            output_dir.display()
        );
        Ok(written)
    }

    /// Suggested output directory for an input file: its parent directory
    pub fn suggest_output_dir(input_path: &Path) -> PathBuf {
        match input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn get_styles(dark_mode: bool, custom_css: Option<&str>) -> String {
        let theme_styles = if dark_mode {
            r#"
            :root {
                --color-page-from: #1a1a1a;
                --color-page-to: #2d2d2d;
                --color-card: rgba(31, 41, 55, 0.5);
                --color-text: #e5e7eb;
                --color-link: #93c5fd;
                --color-code-bg: #111827;
                --color-border: #374151;
                --color-badge-bg: #374151;
                --color-badge-text: #d1d5db;
            }"#
        } else {
            r#"
            :root {
                --color-page-from: #ffffff;
                --color-page-to: #f5f5f5;
                --color-card: rgba(255, 255, 255, 0.5);
                --color-text: #1f2937;
                --color-link: #2563eb;
                --color-code-bg: #f3f4f6;
                --color-border: #e5e7eb;
                --color-badge-bg: #e5e7eb;
                --color-badge-text: #4b5563;
            }"#
        };

        format!(
            r#"<style>
        {}

        * {{
            box-sizing: border-box;
        }}

        body {{
            margin: 0;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--color-text);
        }}

        .poster {{
            display: flex;
            justify-content: center;
            padding: 2rem;
            min-height: 100vh;
            background: linear-gradient(to bottom, var(--color-page-from), var(--color-page-to));
        }}

        .poster-card {{
            position: relative;
            width: 100%;
            max-width: 640px;
            padding: 1.5rem 1.5rem 2.5rem;
            border: 1px solid var(--color-border);
            border-radius: 0.5rem;
            background: var(--color-card);
            backdrop-filter: blur(4px);
        }}

        .poster-card h1 {{ font-size: 1.8em; margin-top: 0; }}
        .poster-card h2 {{ font-size: 1.4em; }}
        .poster-card a {{ color: var(--color-link); text-decoration: none; }}
        .poster-card img {{ max-width: 100%; height: auto; border-radius: 6px; }}

        .poster-card code {{
            background-color: var(--color-code-bg);
            padding: .2em .4em;
            border-radius: 6px;
            font-size: 85%;
        }}

        .poster-card pre {{
            background-color: var(--color-code-bg);
            padding: 16px;
            overflow: auto;
            border-radius: 6px;
        }}

        .poster-card pre code {{ background: transparent; padding: 0; }}

        .poster-card table {{ border-collapse: collapse; width: 100%; }}
        .poster-card th, .poster-card td {{ padding: 6px 13px; border: 1px solid var(--color-border); }}

        .page-badge {{
            position: absolute;
            right: 0.5rem;
            bottom: 0.5rem;
            padding: 0.25rem 0.5rem;
            border-radius: 0.25rem;
            font-size: 0.75rem;
            background: var(--color-badge-bg);
            color: var(--color-badge-text);
        }}

        {}
    </style>"#,
            theme_styles,
            custom_css.unwrap_or("")
        )
    }
}

impl Default for PosterExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// File name for a page: `stem.html` in long mode, `stem-01.html` onwards otherwise
pub fn page_file_name(file_stem: &str, mode: RenderMode, index: usize) -> String {
    if mode.is_paginated() {
        format!("{}-{:02}.html", file_stem, index + 1)
    } else {
        format!("{}.html", file_stem)
    }
}

/// Whether `file_name` is a page file produced under `file_stem` in any mode
fn is_page_file_name(file_name: &str, file_stem: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(file_stem) else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(".html") else {
        return false;
    };
    match rest.strip_prefix('-') {
        None => rest.is_empty(),
        Some(number) => number.len() >= 2 && number.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// Delete page files for `file_stem` in `output_dir` that are not in `keep`
async fn remove_stale_pages(output_dir: &Path, file_stem: &str, keep: &[PathBuf]) -> ExportResult<usize> {
    let dir_error = |source| FileError::DirectoryError {
        path: output_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(output_dir).await.map_err(dir_error)?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
        let path = entry.path();
        let is_stale = entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_page_file_name(name, file_stem))
            && !keep.contains(&path);

        if is_stale {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| FileError::RemoveError {
                    path: path.clone(),
                    source,
                })?;
            log::debug!("Removed stale page {}", path.display());
            removed += 1;
        }
    }

    Ok(removed)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_html() {
        let exporter = PosterExporter::new();
        let options = PosterOptions {
            title: Some("Test".to_string()),
            ..Default::default()
        };

        let html = exporter.render_page("# Hello\n\nWorld", None, &options);

        assert!(html.contains("<title>Test</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
        assert!(!html.contains("page-badge\">"));
    }

    #[test]
    fn test_title_is_escaped() {
        let exporter = PosterExporter::new();
        let options = PosterOptions {
            title: Some("<b>&".to_string()),
            ..Default::default()
        };
        let html = exporter.render_page("x", None, &options);
        assert!(html.contains("<title>&lt;b&gt;&amp;</title>"));
    }

    #[test]
    fn test_badge_shown_for_paginated_pages() {
        let exporter = PosterExporter::new();
        let pages = exporter.render_document(
            "# A\na\n# B\nb",
            RenderMode::Auto,
            &PosterOptions::default(),
        );

        assert_eq!(pages.len(), 2);
        assert!(pages[0].html.contains("<div class=\"page-badge\">1 / 2</div>"));
        assert!(pages[1].html.contains("<div class=\"page-badge\">2 / 2</div>"));
        assert_eq!(pages[1].markdown, "# B\nb");
    }

    #[test]
    fn test_badge_can_be_disabled() {
        let exporter = PosterExporter::new();
        let options = PosterOptions {
            show_page_badge: false,
            ..Default::default()
        };
        let html = exporter.render_page("x", Some((0, 3)), &options);
        assert!(!html.contains("1 / 3"));
    }

    #[test]
    fn test_long_mode_has_single_unnumbered_card() {
        let exporter = PosterExporter::new();
        let pages = exporter.render_document("a\n\n---\n\nb", RenderMode::Long, &PosterOptions::default());
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].html.contains("page-badge\">"));
        assert!(pages[0].html.contains("<hr />"));
    }

    #[test]
    fn test_dark_mode_styles() {
        let exporter = PosterExporter::new();
        let options = PosterOptions {
            dark_mode: true,
            custom_css: Some(".extra { color: red; }".to_string()),
            ..Default::default()
        };
        let html = exporter.render_page("x", None, &options);
        assert!(html.contains("class=\"poster dark\""));
        assert!(html.contains("#1a1a1a"));
        assert!(html.contains(".extra { color: red; }"));
    }

    #[test]
    fn test_page_file_names() {
        assert_eq!(page_file_name("markdown-poster", RenderMode::Long, 0), "markdown-poster.html");
        assert_eq!(page_file_name("markdown-poster", RenderMode::Auto, 0), "markdown-poster-01.html");
        assert_eq!(page_file_name("notes", RenderMode::Manual, 11), "notes-12.html");
    }

    #[test]
    fn test_suggest_output_dir() {
        assert_eq!(
            PosterExporter::suggest_output_dir(Path::new("/docs/readme.md")),
            PathBuf::from("/docs")
        );
        assert_eq!(
            PosterExporter::suggest_output_dir(Path::new("readme.md")),
            PathBuf::from(".")
        );
    }

    #[tokio::test]
    async fn test_export_pages_writes_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PosterExporter::new();

        let written = exporter
            .export_pages(
                "a\n---\nb\n---\nc",
                RenderMode::Manual,
                dir.path(),
                DEFAULT_FILE_STEM,
                &PosterOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(written[0], dir.path().join("markdown-poster-01.html"));
        assert_eq!(written[2], dir.path().join("markdown-poster-03.html"));
        let third = std::fs::read_to_string(&written[2]).unwrap();
        assert!(third.contains("<p>c</p>"));
        assert!(third.contains("3 / 3"));
    }

    #[test]
    fn test_page_file_name_matching() {
        assert!(is_page_file_name("markdown-poster.html", "markdown-poster"));
        assert!(is_page_file_name("markdown-poster-07.html", "markdown-poster"));
        assert!(is_page_file_name("markdown-poster-123.html", "markdown-poster"));
        assert!(!is_page_file_name("markdown-poster-7.html", "markdown-poster"));
        assert!(!is_page_file_name("markdown-poster-notes.html", "markdown-poster"));
        assert!(!is_page_file_name("markdown-poster-01.md", "markdown-poster"));
        assert!(!is_page_file_name("other-01.html", "markdown-poster"));
    }

    fn html_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_shorter_export_removes_leftover_pages() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PosterExporter::new();
        let options = PosterOptions::default();

        let first = exporter
            .export_pages("a\n---\nb\n---\nc", RenderMode::Manual, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();
        assert_eq!(first.len(), 3);

        let second = exporter
            .export_pages("only", RenderMode::Manual, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();

        assert_eq!(second, vec![dir.path().join("markdown-poster-01.html")]);
        assert_eq!(html_files(dir.path()), vec!["markdown-poster-01.html"]);
        let page = std::fs::read_to_string(&second[0]).unwrap();
        assert!(page.contains("<p>only</p>"));
    }

    #[tokio::test]
    async fn test_mode_switch_removes_other_naming_and_keeps_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PosterExporter::new();
        let options = PosterOptions::default();
        std::fs::write(dir.path().join("notes.html"), "keep").unwrap();
        std::fs::write(dir.path().join("other-01.html"), "keep").unwrap();

        exporter
            .export_pages("# A\na\n# B\nb", RenderMode::Auto, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();
        exporter
            .export_pages("# A\na\n# B\nb", RenderMode::Long, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();

        assert_eq!(
            html_files(dir.path()),
            vec!["markdown-poster.html", "notes.html", "other-01.html"]
        );
    }

    #[tokio::test]
    async fn test_emptied_document_clears_previous_pages() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PosterExporter::new();
        let options = PosterOptions::default();

        exporter
            .export_pages("a\n---\nb", RenderMode::Manual, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();
        let written = exporter
            .export_pages("\n", RenderMode::Manual, dir.path(), DEFAULT_FILE_STEM, &options)
            .await
            .unwrap();

        assert!(written.is_empty());
        assert!(html_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_export_empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let exporter = PosterExporter::new();

        let written = exporter
            .export_pages("\n\n", RenderMode::Auto, &out, DEFAULT_FILE_STEM, &PosterOptions::default())
            .await
            .unwrap();

        assert!(written.is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_export_rejects_path_like_stem() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PosterExporter::new();

        let result = exporter
            .export_pages("x", RenderMode::Long, dir.path(), "../escape", &PosterOptions::default())
            .await;

        assert!(matches!(result, Err(ExportError::InvalidFileStem(_))));
    }
}
