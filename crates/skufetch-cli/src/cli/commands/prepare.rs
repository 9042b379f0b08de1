//! `skufetch prepare <ids>...` – build descriptor chunk files from identifier lists.

use anyhow::Result;
use skufetch_core::config::FetchConfig;
use skufetch_core::runner;
use std::path::PathBuf;

pub fn run_prepare(cfg: &FetchConfig, identifier_files: &[PathBuf]) -> Result<()> {
    let summary = runner::prepare(cfg, identifier_files)?;
    println!(
        "Read {} identifier(s), {} unique ({} duplicate(s) dropped)",
        summary.identifiers_read, summary.unique_identifiers, summary.duplicates_dropped
    );
    for path in &summary.chunk_paths {
        println!("  {}", path.display());
    }
    Ok(())
}
