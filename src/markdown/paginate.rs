//! Markdown pagination
//!
//! Splits a Markdown document into the pages that are rendered as
//! individual poster cards. Three modes are supported:
//! - `Long`: the whole document is one page, untouched
//! - `Auto`: one page per top-level (`# `) heading, or fixed 10-line
//!   chunks when the document has no heading to split on
//! - `Manual`: pages separated by a line of three or more dashes
//!
//! Pagination is a pure function of the source text and the mode and is
//! recomputed from scratch on every call.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Number of lines per page when `Auto` mode falls back to fixed chunks
pub const PAGE_LINE_COUNT: usize = 10;

/// How the source document is partitioned into pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Single page containing the full source
    #[default]
    Long,
    /// Split by top-level heading, or by fixed line count without headings
    Auto,
    /// Split on `---` delimiter lines
    Manual,
}

impl RenderMode {
    /// All modes, in menu order
    pub const ALL: [RenderMode; 3] = [RenderMode::Long, RenderMode::Auto, RenderMode::Manual];

    /// Short identifier used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Long => "long",
            RenderMode::Auto => "auto",
            RenderMode::Manual => "manual",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            RenderMode::Long => "Long image",
            RenderMode::Auto => "Auto pagination",
            RenderMode::Manual => "Manual pagination",
        }
    }

    /// Whether this mode may produce more than one page
    pub fn is_paginated(&self) -> bool {
        !matches!(self, RenderMode::Long)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a render mode name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown render mode '{0}' (expected long, auto or manual)")]
pub struct ParseRenderModeError(pub String);

impl FromStr for RenderMode {
    type Err = ParseRenderModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(RenderMode::Long),
            "auto" | "auto-pagination" => Ok(RenderMode::Auto),
            "manual" | "manual-pagination" => Ok(RenderMode::Manual),
            _ => Err(ParseRenderModeError(s.to_string())),
        }
    }
}

/// Split `source` into pages according to `mode`.
///
/// `Long` returns the source verbatim as the only page. The other modes
/// never return a page that is empty after trimming; an empty or
/// whitespace-only source yields no pages at all.
pub fn paginate(source: &str, mode: RenderMode) -> Vec<String> {
    match mode {
        RenderMode::Long => vec![source.to_string()],
        RenderMode::Auto => split_auto(source),
        RenderMode::Manual => split_manual(source),
    }
}

/// Delimiter line for manual pagination: `---` (or longer) alone on a line
fn page_break() -> &'static Regex {
    static PAGE_BREAK: OnceLock<Regex> = OnceLock::new();
    PAGE_BREAK.get_or_init(|| Regex::new(r"\n-{3,}\n").expect("page break pattern is valid"))
}

/// Manual pagination: split on dash delimiter lines, trim, drop empties.
///
/// The delimiter must be bounded by a newline on both sides, so a rule on
/// the very first or last line of the document is not a break. Dash lines
/// inside fenced code blocks are still treated as breaks.
pub fn split_manual(source: &str) -> Vec<String> {
    page_break()
        .split(source)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(String::from)
        .collect()
}

/// Auto pagination: one page per top-level heading section.
///
/// Falls back to fixed [`PAGE_LINE_COUNT`]-line chunks when the heading
/// split produces at most one section. Pages are not trimmed.
pub fn split_auto(source: &str) -> Vec<String> {
    let sections = heading_sections(source);

    if sections.len() <= 1 {
        return split_fixed_lines(source, PAGE_LINE_COUNT);
    }

    sections
        .into_iter()
        .filter(|section| !section.trim().is_empty())
        .map(String::from)
        .collect()
}

/// Cut `source` immediately before every top-level heading line.
///
/// A line starts after any of `\n`, `\r`, U+2028 or U+2029. A heading on
/// the first line does not produce an empty leading section.
fn heading_sections(source: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut section_start = 0;

    for (offset, ch) in source.char_indices() {
        if !is_line_terminator(ch) {
            continue;
        }
        let line_start = offset + ch.len_utf8();
        if is_top_level_heading(&source[line_start..]) {
            sections.push(&source[section_start..line_start]);
            section_start = line_start;
        }
    }
    sections.push(&source[section_start..]);

    sections
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// `#` followed by a space or tab; `##` and deeper do not match
fn is_top_level_heading(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.first() == Some(&b'#') && matches!(bytes.get(1), Some(b' ' | b'\t'))
}

/// Group consecutive lines into chunks of `lines_per_page`, dropping blank chunks
fn split_fixed_lines(source: &str, lines_per_page: usize) -> Vec<String> {
    let lines: Vec<&str> = source.split('\n').collect();

    lines
        .chunks(lines_per_page)
        .map(|chunk| chunk.join("\n"))
        .filter(|page| !page.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line{}\n", i)).collect()
    }

    #[test]
    fn test_long_returns_source_verbatim() {
        let source = "  # Title\n\nbody\n---\nmore  \n";
        assert_eq!(paginate(source, RenderMode::Long), vec![source.to_string()]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(paginate("", RenderMode::Long), vec![String::new()]);
        assert!(paginate("", RenderMode::Auto).is_empty());
        assert!(paginate("", RenderMode::Manual).is_empty());
    }

    #[test]
    fn test_whitespace_only_source() {
        assert!(paginate(" \n\n\t\n", RenderMode::Auto).is_empty());
        assert!(paginate(" \n---\n\n", RenderMode::Manual).is_empty());
    }

    #[test]
    fn test_manual_basic_split() {
        assert_eq!(paginate("a\n---\nb\n", RenderMode::Manual), vec!["a", "b"]);
    }

    #[test]
    fn test_manual_long_delimiter_and_trimming() {
        let pages = paginate("\n  first page \n-------\n\nsecond\n\n", RenderMode::Manual);
        assert_eq!(pages, vec!["first page", "second"]);
    }

    #[test]
    fn test_manual_drops_empty_segments() {
        let pages = paginate("a\n---\n\n---\nb", RenderMode::Manual);
        assert_eq!(pages, vec!["a", "b"]);
    }

    #[test]
    fn test_manual_requires_isolated_dash_line() {
        // Too short, embedded in prose, or missing a bounding newline
        assert_eq!(paginate("a\n--\nb", RenderMode::Manual), vec!["a\n--\nb"]);
        assert_eq!(paginate("a --- b", RenderMode::Manual), vec!["a --- b"]);
        assert_eq!(paginate("---\nbody", RenderMode::Manual), vec!["---\nbody"]);
        assert_eq!(paginate("body\n---", RenderMode::Manual), vec!["body\n---"]);
    }

    #[test]
    fn test_manual_adjacent_delimiters_share_newline() {
        // The first match consumes the newline the second line would need
        let pages = paginate("a\n---\n---\nb", RenderMode::Manual);
        assert_eq!(pages, vec!["a", "---\nb"]);
    }

    #[test]
    fn test_manual_splits_inside_code_fence() {
        let pages = paginate("```\nx\n---\ny\n```", RenderMode::Manual);
        assert_eq!(pages, vec!["```\nx", "y\n```"]);
    }

    #[test]
    fn test_auto_splits_on_top_level_headings() {
        let pages = paginate("pre\n# H1\nbody1\n# H2\nbody2\n", RenderMode::Auto);
        assert_eq!(pages, vec!["pre\n", "# H1\nbody1\n", "# H2\nbody2\n"]);
    }

    #[test]
    fn test_auto_heading_on_first_line() {
        let pages = paginate("# A\nx\n# B\ny", RenderMode::Auto);
        assert_eq!(pages, vec!["# A\nx\n", "# B\ny"]);
    }

    #[test]
    fn test_auto_ignores_lower_level_headings() {
        let pages = paginate("# A\n## sub\nx\n### deeper\n# B\n", RenderMode::Auto);
        assert_eq!(pages, vec!["# A\n## sub\nx\n### deeper\n", "# B\n"]);
    }

    #[test]
    fn test_auto_requires_whitespace_after_hash() {
        let source = "intro\n#hashtag\ntext";
        assert_eq!(paginate(source, RenderMode::Auto), vec![source.to_string()]);
    }

    #[test]
    fn test_auto_accepts_tab_after_hash() {
        let pages = paginate("a\n#\tB\nb", RenderMode::Auto);
        assert_eq!(pages, vec!["a\n", "#\tB\nb"]);
    }

    #[test]
    fn test_auto_drops_blank_sections() {
        let pages = paginate("\n\n# A\na\n# B\nb", RenderMode::Auto);
        assert_eq!(pages, vec!["# A\na\n", "# B\nb"]);
    }

    #[test]
    fn test_auto_falls_back_to_line_chunks() {
        let source = numbered_lines(25);
        let pages = paginate(&source, RenderMode::Auto);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines().count(), 10);
        assert_eq!(pages[1].lines().count(), 10);
        assert_eq!(pages[2].lines().count(), 5);
        assert!(pages[0].starts_with("line1\n"));
        assert!(pages[1].starts_with("line11\n"));
        assert!(pages[2].starts_with("line21\n"));
        assert!(pages[2].ends_with("line25\n"));
    }

    #[test]
    fn test_auto_single_heading_falls_back() {
        // One heading at the very start is a single section
        let source = format!("# Only\n{}", numbered_lines(12));
        let pages = paginate(&source, RenderMode::Auto);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("# Only\nline1\n"));
    }

    #[test]
    fn test_auto_fallback_drops_blank_chunks() {
        let source = format!("{}{}", numbered_lines(10), "\n".repeat(15));
        let pages = paginate(&source, RenderMode::Auto);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_auto_without_trailing_newline() {
        let pages = paginate("a\n# B", RenderMode::Auto);
        assert_eq!(pages, vec!["a\n", "# B"]);
    }

    #[test]
    fn test_auto_heading_after_bare_carriage_return() {
        let pages = paginate("a\r# B\nx", RenderMode::Auto);
        assert_eq!(pages, vec!["a\r", "# B\nx"]);
    }

    #[test]
    fn test_auto_heading_after_crlf() {
        let pages = paginate("intro\r\n# One\r\nbody\r\n# Two\r\n", RenderMode::Auto);
        assert_eq!(pages, vec!["intro\r\n", "# One\r\nbody\r\n", "# Two\r\n"]);
    }

    #[test]
    fn test_auto_heading_after_unicode_separators() {
        let pages = paginate("a\u{2028}# B\u{2029}# C", RenderMode::Auto);
        assert_eq!(pages, vec!["a\u{2028}", "# B\u{2029}", "# C"]);
    }

    #[test]
    fn test_pages_never_blank() {
        let inputs = [
            "",
            "\n\n\n",
            "a\n---\n\n---\n",
            "# A\n\n# B\n\n\n# C",
            "x\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\n\ny",
        ];
        for input in inputs {
            for mode in [RenderMode::Auto, RenderMode::Manual] {
                for page in paginate(input, mode) {
                    assert!(!page.trim().is_empty(), "{:?} / {}", input, mode);
                }
            }
        }
    }

    #[test]
    fn test_pagination_is_deterministic() {
        let source = "pre\n# A\n---\n# B\nbody\n";
        for mode in RenderMode::ALL {
            assert_eq!(paginate(source, mode), paginate(source, mode));
        }
    }

    #[test]
    fn test_render_mode_parsing() {
        assert_eq!("long".parse::<RenderMode>(), Ok(RenderMode::Long));
        assert_eq!("AUTO".parse::<RenderMode>(), Ok(RenderMode::Auto));
        assert_eq!("auto-pagination".parse::<RenderMode>(), Ok(RenderMode::Auto));
        assert_eq!("manual-pagination".parse::<RenderMode>(), Ok(RenderMode::Manual));
        assert!("pages".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_render_mode_serde_names() {
        let json = serde_json::to_string(&RenderMode::Manual).unwrap();
        assert_eq!(json, "\"manual\"");
        let mode: RenderMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(mode, RenderMode::Auto);
    }

    #[test]
    fn test_render_mode_display_names() {
        let names: Vec<_> = RenderMode::ALL.iter().map(RenderMode::display_name).collect();
        assert_eq!(names, vec!["Long image", "Auto pagination", "Manual pagination"]);
    }

    #[test]
    fn test_render_mode_default_is_long() {
        assert_eq!(RenderMode::default(), RenderMode::Long);
        assert!(!RenderMode::Long.is_paginated());
        assert!(RenderMode::Auto.is_paginated());
    }
}
