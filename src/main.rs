mod groups;
mod headings;
mod meta;
mod render;
mod scan;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kb_index", about = "Knowledge base index page builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild index.html from the documents directory
    Build {
        /// Documents directory
        #[arg(short, long, default_value = "pages")]
        dir: PathBuf,
    },
    /// Write a TSV of each ASCII-named page's first <h1>
    Headings {
        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show document counts per archive group
    Stats {
        /// Documents directory
        #[arg(short, long, default_value = "pages")]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { dir } => build_index(&dir),
        Commands::Headings { dir } => {
            let count = headings::write_report(&dir)?;
            println!(
                "Wrote {} ({} files)",
                dir.join(headings::OUTPUT_FILE).display(),
                count
            );
            Ok(())
        }
        Commands::Stats { dir } => print_stats(&dir),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn build_index(dir: &Path) -> anyhow::Result<()> {
    let files = scan::list_documents(dir)?;
    let now = SystemTime::now();
    let docs: Vec<meta::Document> = files.iter().map(|f| meta::read_document(f, now)).collect();

    let archive = groups::group_by_month(&docs);
    let html = render::render_index(&docs, groups::latest(&docs), &archive, Local::now());

    let out = dir.join(scan::INDEX_FILE);
    fs::write(&out, html).with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Wrote {} ({} documents, {} groups)",
        out.display(),
        docs.len(),
        archive.len()
    );
    Ok(())
}

fn print_stats(dir: &Path) -> anyhow::Result<()> {
    let files = scan::list_documents(dir)?;
    let now = SystemTime::now();
    let docs: Vec<meta::Document> = files.iter().map(|f| meta::read_document(f, now)).collect();
    let archive = groups::group_by_month(&docs);

    if docs.is_empty() {
        println!("No documents in {}", dir.display());
        return Ok(());
    }

    for group in &archive {
        println!("{:<12} {:>4}", group.key, group.docs.len());
    }
    let new_count = docs.iter().filter(|d| d.is_new).count();
    println!("\nTotal: {} documents ({} new)", docs.len(), new_count);
    Ok(())
}

// ── Tests ──
