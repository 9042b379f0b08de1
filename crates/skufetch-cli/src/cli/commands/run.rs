//! `skufetch run` – fetch a descriptor file and write outcome tables.

use anyhow::Result;
use skufetch_core::config::FetchConfig;
use skufetch_core::fetcher::HttpTransport;
use skufetch_core::runner;
use std::path::Path;
use std::sync::Arc;

pub async fn run_fetch(cfg: &FetchConfig, input: &Path, log_path: Option<&Path>) -> Result<()> {
    cfg.validate()?;
    let transport = Arc::new(HttpTransport::new(cfg.request_timeout())?);
    let summary = runner::run(cfg, input, transport).await?;

    println!();
    println!(
        "Processed {} line(s): {} ok, {} failed, {} rejected",
        summary.lines_read,
        summary.succeeded,
        summary.failed,
        summary.rejected.len()
    );
    println!(
        "Outcomes saved in: {} ({} file(s))",
        cfg.output_dir.display(),
        summary.outcome_paths.len()
    );
    if let Some(path) = &summary.failures_path {
        println!("Failures saved in: {}", path.display());
    }
    for (path, err) in &summary.write_errors {
        println!("Not written: {} ({})", path.display(), err);
    }
    if let Some(path) = log_path {
        println!("Log saved in: {}", path.display());
    }
    Ok(())
}
