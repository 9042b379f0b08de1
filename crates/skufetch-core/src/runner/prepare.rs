//! Build descriptor files from identifier lists: dedupe, render curl commands, chunk.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::chunk;
use crate::config::FetchConfig;
use crate::descriptor::render_command;
use crate::input;
use crate::sink;

use super::descriptor_file_name;

#[derive(Debug, Clone, Default)]
pub struct PrepareSummary {
    pub identifiers_read: usize,
    pub unique_identifiers: usize,
    pub duplicates_dropped: usize,
    pub chunk_paths: Vec<PathBuf>,
}

/// Write `descriptors_NNNN.csv` files (`cfg.chunk_size` commands each) for the
/// distinct identifiers found in `identifier_files`, in first-seen order.
pub fn prepare(cfg: &FetchConfig, identifier_files: &[PathBuf]) -> Result<PrepareSummary> {
    cfg.validate()?;
    if cfg.base_url.is_empty() {
        anyhow::bail!("base_url is not configured (set it in config.toml or pass --base-url)");
    }
    if cfg.require_cookie && cfg.cookie.is_none() {
        anyhow::bail!(
            "cookie is not configured but require_cookie is set; pass --cookie or set require_cookie = false"
        );
    }

    let ids = input::read_identifiers(identifier_files)?;
    let identifiers_read = ids.len();
    let unique = input::dedup_identifiers(ids);
    let unique_identifiers = unique.len();
    if identifiers_read > unique_identifiers {
        tracing::info!(
            "dropped {} duplicate identifier(s)",
            identifiers_read - unique_identifiers
        );
    }

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir: {}", cfg.output_dir.display()))?;

    let commands: Vec<String> = unique
        .iter()
        .map(|id| render_command(&cfg.base_url, id, cfg.cookie.as_deref()))
        .collect();

    let mut chunk_paths = Vec::new();
    for (i, commands) in chunk::chunk(commands, cfg.chunk_size).into_iter().enumerate() {
        let path = cfg.output_dir.join(descriptor_file_name(i + 1));
        sink::write_descriptor_chunk(&path, &commands)?;
        tracing::info!("wrote {} command(s) to {}", commands.len(), path.display());
        chunk_paths.push(path);
    }

    Ok(PrepareSummary {
        identifiers_read,
        unique_identifiers,
        duplicates_dropped: identifiers_read - unique_identifiers,
        chunk_paths,
    })
}
