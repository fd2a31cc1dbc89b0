use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::{Duration, SystemTime};

use regex::Regex;
use tracing::debug;

use crate::scan::DocFile;

static TITLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static DATE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{8}_|\d{6}_|\d{4}-\d{2}-\d{2}_)").unwrap());
static FULL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})").unwrap());
static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Fallback bucket for documents without a recognizable date prefix.
pub const OTHER_GROUP: &str = "その他";

/// Documents modified within this window get the NEW badge.
pub const FRESH_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub title: String,
    pub date_label: String,
    pub is_new: bool,
}

/// Build a Document from a scanned file. Read and timestamp failures
/// degrade to filename-derived metadata; nothing here aborts the run.
pub fn read_document(file: &DocFile, now: SystemTime) -> Document {
    let title = title_from_contents(&file.path)
        .unwrap_or_else(|| title_from_name(&file.name));

    let is_new = fs::metadata(&file.path)
        .and_then(|m| m.modified())
        .map(|mtime| is_fresh(mtime, now))
        .unwrap_or(false);

    Document {
        name: file.name.clone(),
        title,
        date_label: date_label(&file.name),
        is_new,
    }
}

/// First non-empty `<title>` tag, whitespace-collapsed. None when the file
/// is unreadable or carries no usable tag.
fn title_from_contents(path: &Path) -> Option<String> {
    let html = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            debug!("Falling back to filename title for {}: {}", path.display(), e);
            return None;
        }
    };
    let caps = TITLE_TAG_RE.captures(&html)?;
    let title = collapse_ws(&decode_entities(&caps[1]));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Filename stem with one leading date prefix stripped and underscores
/// turned into spaces: `20240101_demo.html` → "demo".
pub fn title_from_name(name: &str) -> String {
    let stem = name.strip_suffix(".html").unwrap_or(name);
    let stripped = DATE_PREFIX_RE.replace(stem, "");
    stripped.replace('_', " ")
}

/// `20240115_x.html` → "2024-01-15", `202401_y.html` → "2024-01",
/// `notes.html` → "".
pub fn date_label(name: &str) -> String {
    if let Some(caps) = FULL_DATE_RE.captures(name) {
        return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = MONTH_RE.captures(name) {
        return format!("{}-{}", &caps[1], &caps[2]);
    }
    String::new()
}

/// Archive grouping key from the leading `YYYYMM`, sentinel otherwise.
pub fn month_key(name: &str) -> String {
    match MONTH_RE.captures(name) {
        Some(caps) => format!("{}年{}月", &caps[1], &caps[2]),
        None => OTHER_GROUP.to_string(),
    }
}

fn is_fresh(mtime: SystemTime, now: SystemTime) -> bool {
    match now.duration_since(mtime) {
        Ok(age) => age <= FRESH_WINDOW,
        // Modified "in the future" (clock skew) still counts as fresh
        Err(_) => true,
    }
}

pub fn collapse_ws(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").to_string()
}

/// Decode the named entities the builder emits plus the numeric apostrophe.
/// Anything else passes through untouched.
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

// ── Tests ──
