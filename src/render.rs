use chrono::{DateTime, Local};

use crate::groups::ArchiveGroup;
use crate::meta::{Document, OTHER_GROUP};
use crate::scan::{SCRIPT_FILE, STYLESHEET_FILE};

/// Assemble the whole index page. Pure function of its inputs, so the same
/// documents and timestamp always produce byte-identical output.
pub fn render_index(
    docs: &[Document],
    latest: &[Document],
    groups: &[ArchiveGroup],
    generated_at: DateTime<Local>,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>資料一覧</title>
<link rel="stylesheet" href="{stylesheet}">
</head>
<body>
<header>
<h1>資料一覧</h1>
<button id="toggleTheme" type="button" aria-label="テーマ切替">🌓</button>
</header>
{toolbar}
{jump_nav}
<main>
{latest_section}
{archive_sections}
</main>
<footer>更新: {timestamp} ・ 全{count}件</footer>
<script src="{script}?v=2"></script>
</body>
</html>
"#,
        stylesheet = STYLESHEET_FILE,
        toolbar = render_toolbar(),
        jump_nav = render_jump_nav(groups),
        latest_section = render_latest(latest),
        archive_sections = render_archives(groups),
        timestamp = generated_at.format("%Y-%m-%d %H:%M"),
        count = docs.len(),
        script = SCRIPT_FILE,
    )
}

fn render_toolbar() -> String {
    // Element ids are the client script's contract; keep them stable.
    r#"<div class="toolbar">
<input type="search" id="searchDocs" placeholder="検索（/ でフォーカス）">
<button id="clearSearch" type="button" aria-label="クリア">×</button>
<span id="search-status" class="search-status" role="status"></span>
</div>"#
        .to_string()
}

fn render_jump_nav(groups: &[ArchiveGroup]) -> String {
    if groups.is_empty() {
        return String::new();
    }
    let links: Vec<String> = groups
        .iter()
        .map(|g| {
            format!(
                r##"<a href="#{id}">{label}</a>"##,
                id = group_id(&g.key),
                label = escape_html(&g.key),
            )
        })
        .collect();
    format!(r#"<nav class="jump">{}</nav>"#, links.join("\n"))
}

fn render_latest(latest: &[Document]) -> String {
    format!(
        r#"<details class="latest" id="latest" open>
<summary>最新 {count} 件</summary>
<ul>
{entries}
</ul>
</details>"#,
        count = latest.len(),
        entries = render_entries(latest),
    )
}

fn render_archives(groups: &[ArchiveGroup]) -> String {
    groups
        .iter()
        .map(render_group)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_group(group: &ArchiveGroup) -> String {
    // Dated groups open by default; the sentinel bucket stays collapsed.
    let open = if group.key == OTHER_GROUP { "" } else { " open" };
    format!(
        r#"<details class="archive" id="{id}" data-kind="archive"{open}>
<summary>{label}（{count}件）</summary>
<ul>
{entries}
</ul>
</details>"#,
        id = group_id(&group.key),
        open = open,
        label = escape_html(&group.key),
        count = group.docs.len(),
        entries = render_entries(&group.docs),
    )
}

fn render_entries(docs: &[Document]) -> String {
    docs.iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One list item. The data attributes and the `.doc-title` span are what
/// the client-side search filters on and highlights into.
fn render_entry(doc: &Document) -> String {
    let date = if doc.date_label.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="doc-date">{}</span>"#,
            escape_html(&doc.date_label)
        )
    };
    let badge = if doc.is_new {
        r#"<span class="badge-new">NEW</span>"#
    } else {
        ""
    };
    let search = format!("{} {} {}", doc.title, doc.name, doc.date_label);
    format!(
        r#"<li><a href="{href}" data-title="{title}" data-search="{search}"><span class="doc-title">{title}</span>{date}{badge}</a></li>"#,
        href = escape_html(&doc.name),
        title = escape_html(&doc.title),
        search = escape_html(search.trim()),
        date = date,
        badge = badge,
    )
}

/// Stable fragment id per group: "2024年05月" → "g-202405", sentinel → "g-other".
fn group_id(key: &str) -> String {
    if key == OTHER_GROUP {
        return "g-other".to_string();
    }
    let digits: String = key.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("g-{}", digits)
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ── Tests ──
