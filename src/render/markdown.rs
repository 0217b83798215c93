//! Markdown-to-HTML conversion
//!
//! Single-pass, line oriented: `#` through `####` headings, everything else
//! a paragraph. Blank lines are dropped. Inline markup is passed through
//! untouched; this is not a standards-compliant renderer and does not try
//! to be.

/// Convert markdown text to an HTML fragment.
#[must_use]
pub fn to_html(markdown: &str) -> String {
    markdown
        .lines()
        .filter(|line| !line.is_empty())
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(line: &str) -> String {
    let (tag, content) = if let Some(rest) = line.strip_prefix("# ") {
        ("h1", rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        ("h2", rest)
    } else if let Some(rest) = line.strip_prefix("### ") {
        ("h3", rest)
    } else if let Some(rest) = line.strip_prefix("#### ") {
        ("h4", rest)
    } else {
        ("p", line)
    };
    format!("<{tag}>{content}</{tag}>")
}
