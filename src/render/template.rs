//! Line-based template composition
//!
//! Templates are `.sam` files assembled line by line with three directives,
//! each on its own line:
//!
//! - `{{ extends base }}` — splice this file's lines into `base.sam` at its
//!   `{{ content }}` line;
//! - `{{ includes nav }}` — splice `includes/nav.sam` in place;
//! - `{{ content }}` — placeholder inside a base template.
//!
//! Directives resolve recursively with a fixed depth limit guarding
//! include cycles.

use std::io;
use std::path::Path;

const TEMPLATE_EXT: &str = "sam";
const INCLUDES_DIR: &str = "includes";
const MAX_DEPTH: usize = 16;

enum Directive<'a> {
    Extends(&'a str),
    Includes(&'a str),
    Content,
}

/// Render template `name` from `template_dir` into a single HTML string.
pub fn render(template_dir: &Path, name: &str) -> io::Result<String> {
    let file = template_file(template_dir, name);
    let lines = load_template(template_dir, &file, 0)?;
    Ok(lines.join("\n"))
}

fn template_file(dir: &Path, name: &str) -> std::path::PathBuf {
    // Directive arguments may carry the extension already
    let stem = name.trim_end_matches(&format!(".{TEMPLATE_EXT}"));
    dir.join(format!("{stem}.{TEMPLATE_EXT}"))
}

fn load_template(dir: &Path, file: &Path, depth: usize) -> io::Result<Vec<String>> {
    if depth > MAX_DEPTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "template nesting deeper than {MAX_DEPTH} at '{}' (include cycle?)",
                file.display()
            ),
        ));
    }

    let text = std::fs::read_to_string(file)?;
    let mut content: Vec<String> = Vec::new();
    let mut extended: Option<Vec<String>> = None;

    for line in text.lines() {
        match parse_directive(line) {
            Some(Directive::Extends(name)) => {
                let base = template_file(dir, name);
                let base_lines = load_template(dir, &base, depth + 1)?;
                match &mut extended {
                    None => extended = Some(base_lines),
                    Some(lines) => lines.extend(base_lines),
                }
            }
            Some(Directive::Includes(name)) => {
                let include = template_file(&dir.join(INCLUDES_DIR), name);
                content.extend(load_template(dir, &include, depth + 1)?);
            }
            // A content marker outside an extends context stays literal so
            // the enclosing base template can still find it.
            Some(Directive::Content) | None => content.push(line.to_string()),
        }
    }

    if let Some(mut base) = extended {
        match base
            .iter()
            .position(|l| matches!(parse_directive(l), Some(Directive::Content)))
        {
            Some(pos) => {
                base.splice(pos..=pos, content);
            }
            // Base without a content marker: the page's own lines go last
            None => base.extend(content),
        }
        return Ok(base);
    }
    Ok(content)
}

/// Recognize a directive line: `{{ extends name }}`, `{{ includes name }}`
/// or `{{ content }}` with free whitespace.
fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let inner = line
        .trim()
        .strip_prefix("{{")?
        .strip_suffix("}}")?
        .trim();
    let mut tokens = inner.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some("content"), None, None) => Some(Directive::Content),
        (Some("extends"), Some(name), None) => Some(Directive::Extends(name)),
        (Some("includes"), Some(name), None) => Some(Directive::Includes(name)),
        _ => None,
    }
}
