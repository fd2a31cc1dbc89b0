use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use crate::meta::{collapse_ws, decode_entities};

/// Fixed report path inside the scanned directory.
pub const OUTPUT_FILE: &str = "html_h1_list_ascii_filename_only.tsv";

// ASCII filenames only; 日本語名のページは対象外
static ASCII_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+\.html$").unwrap());
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b([^>]*)>(.*?)</h1>").unwrap());
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bid\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#).unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Scan `dir` for ASCII-named `.html` files and write a TSV of each file's
/// first `<h1>` id and text. Returns the number of files reported.
pub fn write_report(dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if ASCII_NAME_RE.is_match(&name) {
            names.push(name);
        }
    }
    names.sort();

    let mut rows = vec!["filename\th1_id\th1_text".to_string()];
    for name in &names {
        let path = dir.join(name);
        let html = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };
        let (id, text) = first_h1(&html);
        rows.push(format!("{}\t{}\t{}", name, id, text));
    }

    let out = dir.join(OUTPUT_FILE);
    fs::write(&out, rows.join("\n"))
        .with_context(|| format!("Failed to write report {}", out.display()))?;
    Ok(rows.len() - 1)
}

/// First `<h1>` of a document as (id attribute, trimmed text), both empty
/// when the element is absent.
fn first_h1(html: &str) -> (String, String) {
    let Some(caps) = H1_RE.captures(html) else {
        return (String::new(), String::new());
    };
    let id = ID_ATTR_RE
        .captures(&caps[1])
        .and_then(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let text = collapse_ws(&decode_entities(&TAG_RE.replace_all(&caps[2], "")));
    (id, text)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_with_id_and_nested_markup() {
        let (id, text) = first_h1(r#"<body><h1 id="intro">Setup <em>guide</em></h1></body>"#);
        assert_eq!(id, "intro");
        assert_eq!(text, "Setup guide");
    }

    #[test]
    fn h1_without_id() {
        let (id, text) = first_h1("<h1>\n  Plain   heading\n</h1>");
        assert_eq!(id, "");
        assert_eq!(text, "Plain heading");
    }

    #[test]
    fn only_first_h1_counts() {
        let (id, text) = first_h1(r#"<h1 id='a'>First</h1><h1 id='b'>Second</h1>"#);
        assert_eq!(id, "a");
        assert_eq!(text, "First");
    }

    #[test]
    fn unquoted_id_attribute() {
        let (id, _) = first_h1("<h1 id=top class=big>Top</h1>");
        assert_eq!(id, "top");
    }

    #[test]
    fn no_h1_yields_empty_columns() {
        let (id, text) = first_h1("<html><h2>only h2</h2></html>");
        assert_eq!(id, "");
        assert_eq!(text, "");
    }

    #[test]
    fn entities_decoded_in_text() {
        let (_, text) = first_h1("<h1>Q&amp;A &lt;basics&gt;</h1>");
        assert_eq!(text, "Q&A <basics>");
    }

    #[test]
    fn report_filters_to_ascii_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("setup_guide.html"), "<h1 id=\"s\">Setup</h1>").unwrap();
        fs::write(tmp.path().join("zz_last.html"), "<p>no heading</p>").unwrap();
        fs::write(tmp.path().join("議事録.html"), "<h1>skip</h1>").unwrap();
        fs::write(tmp.path().join("has-dash.html"), "<h1>skip</h1>").unwrap();
        fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let count = write_report(tmp.path()).unwrap();
        assert_eq!(count, 2);

        let tsv = fs::read_to_string(tmp.path().join(OUTPUT_FILE)).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "filename\th1_id\th1_text");
        assert_eq!(lines[1], "setup_guide.html\ts\tSetup");
        assert_eq!(lines[2], "zz_last.html\t\t");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn report_rows_sorted_by_filename() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("b_page.html"), "<h1>B</h1>").unwrap();
        fs::write(tmp.path().join("a_page.html"), "<h1>A</h1>").unwrap();

        write_report(tmp.path()).unwrap();
        let tsv = fs::read_to_string(tmp.path().join(OUTPUT_FILE)).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert!(lines[1].starts_with("a_page.html"));
        assert!(lines[2].starts_with("b_page.html"));
    }
}
