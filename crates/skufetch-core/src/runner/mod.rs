//! Run coordinator: input file → descriptors → chunks → waves → outcome tables.
//!
//! Owns the single permit pool shared by every chunk of every wave, so
//! `concurrency_limit` bounds in-flight requests for the whole run. Each
//! chunk's failures come back in its report and are merged here; nothing
//! else touches the run's failure list.

mod prepare;

pub use prepare::{prepare, PrepareSummary};

use anyhow::{Context, Result};
use futures::future::join_all;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::chunk;
use crate::config::FetchConfig;
use crate::descriptor::RequestDescriptor;
use crate::fetcher::{FetchReport, Fetcher, Transport};
use crate::input::{self, RejectedLine};
use crate::progress::RunProgress;
use crate::sink;

pub const FAILURES_FILE: &str = "failures.csv";

pub fn outcome_file_name(chunk_index: usize) -> String {
    format!("outcomes_{:04}.csv", chunk_index)
}

pub fn descriptor_file_name(chunk_index: usize) -> String {
    format!("descriptors_{:04}.csv", chunk_index)
}

/// What a run did and where it wrote it.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub lines_read: usize,
    pub descriptors: usize,
    pub rejected: Vec<RejectedLine>,
    pub succeeded: usize,
    pub failed: usize,
    pub chunks: usize,
    pub outcome_paths: Vec<PathBuf>,
    pub failures_path: Option<PathBuf>,
    /// Tables that could not be written, with the error text.
    pub write_errors: Vec<(PathBuf, String)>,
}

/// Fetch every descriptor in `input` and write one outcome table per chunk
/// under `cfg.output_dir`, plus `failures.csv` if any request failed.
///
/// Fails only if the config is invalid, the input cannot be read or the output
/// directory cannot be created. Bad lines, failed requests and tables that
/// cannot be written are recorded and the run continues.
pub async fn run(
    cfg: &FetchConfig,
    input_path: &Path,
    transport: Arc<dyn Transport>,
) -> Result<RunSummary> {
    cfg.validate()?;
    let input_file = input::read_records(input_path, cfg.input_has_header)?;
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir: {}", cfg.output_dir.display()))?;

    let parsed = input::parse_records(input_file, cfg);
    tracing::info!(
        "read {} line(s) from {}: {} descriptor(s), {} rejected",
        parsed.lines_read,
        input_path.display(),
        parsed.descriptors.len(),
        parsed.rejected.len()
    );

    let permits = Arc::new(Semaphore::new(
        cfg.concurrency_limit.min(Semaphore::MAX_PERMITS),
    ));
    let fetcher = Fetcher::new(transport, permits, cfg.request_timeout());

    let total = parsed.descriptors.len();
    let chunks = chunk::chunk(parsed.descriptors, cfg.chunk_size);
    let chunk_count = chunks.len();
    let waves = chunk::wave(chunks, cfg.chunk_wave_width);
    let wave_count = waves.len();

    let mut progress = RunProgress::new(total);
    let mut failures = Vec::new();
    let mut outcome_paths = Vec::with_capacity(chunk_count);
    let mut write_errors = Vec::new();
    let mut next_chunk_index = 1;

    for (wave_index, wave) in waves.into_iter().enumerate() {
        let first_index = next_chunk_index;
        let shared = &fetcher;
        let jobs = wave.iter().enumerate().map(move |(offset, descriptors)| {
            let path = cfg.output_dir.join(outcome_file_name(first_index + offset));
            run_chunk(shared, descriptors, path)
        });
        next_chunk_index += wave.len();

        for (path, report, written) in join_all(jobs).await {
            progress.record(report.outcomes.len(), report.failed());
            failures.extend(report.failures);
            match written {
                Ok(()) => outcome_paths.push(path),
                Err(e) => write_errors.push((path, format!("{:#}", e))),
            }
        }
        tracing::info!(
            "wave {}/{} done: {}/{} ({:.1}%)",
            wave_index + 1,
            wave_count,
            progress.processed,
            progress.total,
            progress.fraction() * 100.0
        );
    }

    let failures_path = if failures.is_empty() {
        None
    } else {
        let path = cfg.output_dir.join(FAILURES_FILE);
        match sink::write_failures(&path, &failures) {
            Ok(()) => {
                tracing::warn!("{} request(s) failed, see {}", failures.len(), path.display());
                Some(path)
            }
            Err(e) => {
                tracing::error!(
                    "could not write {} failure record(s) to {}: {:#}",
                    failures.len(),
                    path.display(),
                    e
                );
                write_errors.push((path, format!("{:#}", e)));
                None
            }
        }
    };

    tracing::info!(
        "processed {} line(s): {} ok, {} failed, {} rejected; outcomes in {}",
        parsed.lines_read,
        progress.succeeded(),
        progress.failed,
        parsed.rejected.len(),
        cfg.output_dir.display()
    );

    Ok(RunSummary {
        lines_read: parsed.lines_read,
        descriptors: total,
        rejected: parsed.rejected,
        succeeded: progress.succeeded(),
        failed: progress.failed,
        chunks: chunk_count,
        outcome_paths,
        failures_path,
        write_errors,
    })
}

/// Fetch one chunk and write its outcome table once all of its requests resolved.
/// The report is returned even when the table write fails.
async fn run_chunk(
    fetcher: &Fetcher,
    descriptors: &[RequestDescriptor],
    path: PathBuf,
) -> (PathBuf, FetchReport, Result<()>) {
    let report = fetcher.fetch_all(descriptors).await;
    let written = sink::write_outcomes(&path, &report.outcomes);
    match &written {
        Ok(()) => tracing::info!(
            "chunk {}: {} ok, {} error",
            path.display(),
            report.succeeded(),
            report.failed()
        ),
        Err(e) => tracing::error!(
            "chunk {}: {} outcome(s) not written: {:#}",
            path.display(),
            report.outcomes.len(),
            e
        ),
    }
    (path, report, written)
}
