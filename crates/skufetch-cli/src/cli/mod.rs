//! CLI for skufetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use skufetch_core::config::{self, FetchConfig, InputKind};
use skufetch_core::logging;
use std::path::PathBuf;

use commands::{run_fetch, run_prepare, run_show_config};

/// Top-level CLI for skufetch.
#[derive(Debug, Parser)]
#[command(name = "skufetch")]
#[command(about = "skufetch: bounded-concurrency batch GET runner for catalog endpoints", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/skufetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Settings that override config.toml for one invocation.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Maximum simultaneous requests for the whole run.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
    /// Descriptors per chunk (one output file per chunk).
    #[arg(long, value_name = "N")]
    pub chunk_size: Option<usize>,
    /// Chunks processed concurrently.
    #[arg(long, value_name = "N")]
    pub wave_width: Option<usize>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
    /// Catalog URL prefix for identifiers.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
    /// Cookie value sent with identifier requests.
    #[arg(long, value_name = "VALUE")]
    pub cookie: Option<String>,
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut FetchConfig) {
        if let Some(n) = self.concurrency {
            cfg.concurrency_limit = n;
        }
        if let Some(n) = self.chunk_size {
            cfg.chunk_size = n;
        }
        if let Some(n) = self.wave_width {
            cfg.chunk_wave_width = n;
        }
        if let Some(secs) = self.timeout_secs {
            cfg.request_timeout_secs = secs;
        }
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(cookie) = &self.cookie {
            cfg.cookie = Some(cookie.clone());
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            cfg.log_dir = dir.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every descriptor in INPUT and write outcome tables.
    Run {
        /// Descriptor file: one curl command (or identifier) per record.
        input: PathBuf,

        /// Records are bare identifiers appended to base_url.
        #[arg(long)]
        identifiers: bool,

        /// Accept command lines without a Cookie header.
        #[arg(long)]
        allow_missing_cookie: bool,

        /// The first record is data, not a header row.
        #[arg(long)]
        no_header: bool,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Build descriptor files from identifier lists (deduplicated, chunked).
    Prepare {
        /// Text files with one identifier per line.
        #[arg(required = true, num_args = 1..)]
        identifiers: Vec<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let (mut cfg, created_config) = match &cli.config {
            Some(path) => (config::load_from_path(path)?, None),
            None => config::load_or_init()?,
        };

        match &cli.command {
            CliCommand::Run {
                identifiers,
                allow_missing_cookie,
                no_header,
                overrides,
                ..
            } => {
                overrides.apply(&mut cfg);
                if *identifiers {
                    cfg.input_kind = InputKind::Identifier;
                }
                if *allow_missing_cookie {
                    cfg.require_cookie = false;
                }
                if *no_header {
                    cfg.input_has_header = false;
                }
            }
            CliCommand::Prepare { overrides, .. } => overrides.apply(&mut cfg),
            CliCommand::Config => {}
        }

        let log_path = if matches!(cli.command, CliCommand::Config) {
            None
        } else {
            match logging::init_run_logging(&cfg.log_dir) {
                Ok(path) => Some(path),
                Err(e) => {
                    logging::init_logging_stderr();
                    tracing::warn!("file logging unavailable ({:#}); logging to stderr", e);
                    None
                }
            }
        };
        if let Some(path) = &created_config {
            if matches!(cli.command, CliCommand::Config) {
                eprintln!("created default config at {}", path.display());
            } else {
                tracing::info!("created default config at {}", path.display());
            }
        }
        tracing::debug!("effective config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { input, .. } => run_fetch(&cfg, &input, log_path.as_deref()).await?,
            CliCommand::Prepare { identifiers, .. } => run_prepare(&cfg, &identifiers)?,
            CliCommand::Config => run_show_config(cli.config.as_deref(), &cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
