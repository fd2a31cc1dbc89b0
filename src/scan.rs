use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Output of the builder; must never be listed as a document.
pub const INDEX_FILE: &str = "index.html";
/// Well-known asset files referenced by the rendered page.
pub const STYLESHEET_FILE: &str = "knowledge.css";
pub const SCRIPT_FILE: &str = "knowledge-ui.js";

#[derive(Debug)]
pub struct DocFile {
    pub name: String,
    pub path: PathBuf,
}

/// List `.html` documents under `dir`, filename-descending.
///
/// Descending lexical order doubles as newest-first for `YYYYMMDD_...`
/// names. The index output and the two asset files are excluded by exact
/// name; everything else ending in `.html` counts, non-ASCII names included.
pub fn list_documents(dir: &Path) -> Result<Vec<DocFile>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read documents directory {}", dir.display()))?;

    let mut docs = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }
        if name == INDEX_FILE || name == STYLESHEET_FILE || name == SCRIPT_FILE {
            continue;
        }
        docs.push(DocFile {
            name: name.to_string(),
            path,
        });
    }

    docs.sort_by(|a, b| b.name.cmp(&a.name));
    debug!("Found {} documents in {}", docs.len(), dir.display());
    Ok(docs)
}

// ── Tests ──
