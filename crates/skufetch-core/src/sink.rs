//! Result sink: outcome tables, the failure table, and descriptor chunk files.
//!
//! Every table is written to a temp file in the destination directory and then
//! renamed over the target, so a table is either the previous version or the
//! complete new one. Writing never appends.

use anyhow::{Context, Result};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::fetcher::{FailureRecord, Outcome};

pub const OUTCOME_HEADER: [&str; 3] = ["sequence_number", "url", "status"];
pub const FAILURE_HEADER: [&str; 3] = ["sequence_number", "url", "error_detail"];
pub const DESCRIPTOR_HEADER: [&str; 1] = ["command"];

fn write_table<R, I>(path: &Path, header: &[&str], rows: R) -> Result<()>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
    }
    tmp.as_file().sync_all().context("sync table")?;
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Overwrite `path` with a header row and one row per outcome, in order.
pub fn write_outcomes(path: &Path, outcomes: &[Outcome]) -> Result<()> {
    let rows = outcomes.iter().map(|o| {
        [
            o.sequence_number.to_string(),
            o.target_url.clone(),
            o.status.to_string(),
        ]
    });
    write_table(path, &OUTCOME_HEADER, rows)?;
    tracing::debug!("wrote {} outcome(s) to {}", outcomes.len(), path.display());
    Ok(())
}

/// Overwrite `path` with the run's failure table.
pub fn write_failures(path: &Path, failures: &[FailureRecord]) -> Result<()> {
    let rows = failures.iter().map(|f| {
        [
            f.sequence_number.to_string(),
            f.target_url.clone(),
            f.error_detail.clone(),
        ]
    });
    write_table(path, &FAILURE_HEADER, rows)?;
    tracing::debug!("wrote {} failure(s) to {}", failures.len(), path.display());
    Ok(())
}

/// Overwrite `path` with a `command` header and one command per row.
pub fn write_descriptor_chunk(path: &Path, commands: &[String]) -> Result<()> {
    write_table(path, &DESCRIPTOR_HEADER, commands.iter().map(|c| [c.as_str()]))
}
