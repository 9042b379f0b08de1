use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::descriptor::ParseMode;

/// How each input record is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Record is a curl-style command string embedding the URL (and cookie).
    #[default]
    Command,
    /// Record is a bare product identifier appended to `base_url`.
    Identifier,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Run configuration loaded from `~/.config/skufetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum simultaneous in-flight requests across the whole run.
    pub concurrency_limit: usize,
    /// Descriptors per chunk (one outcome table per chunk).
    pub chunk_size: usize,
    /// Chunks fetched concurrently in one wave.
    pub chunk_wave_width: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Catalog endpoint prefix for identifier input, e.g. `https://host/_v/catalog/`.
    pub base_url: String,
    /// Static cookie value sent as `Cookie: <value>` with identifier requests.
    pub cookie: Option<String>,
    /// Reject command lines that carry no `Cookie:` header.
    pub require_cookie: bool,
    pub input_kind: InputKind,
    /// Skip the first record of the input file.
    pub input_has_header: bool,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            chunk_size: 8000,
            chunk_wave_width: 2,
            request_timeout_secs: 15,
            base_url: String::new(),
            cookie: None,
            require_cookie: true,
            input_kind: InputKind::Command,
            input_has_header: true,
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse mode for command records, derived from `require_cookie`.
    pub fn parse_mode(&self) -> ParseMode {
        if self.require_cookie {
            ParseMode::RequireCookie
        } else {
            ParseMode::UrlOnly
        }
    }

    /// Check field ranges. CLI overrides must be applied before calling this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("concurrency_limit", self.concurrency_limit as u64),
            ("chunk_size", self.chunk_size as u64),
            ("chunk_wave_width", self.chunk_wave_width as u64),
            ("request_timeout_secs", self.request_timeout_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        if !self.base_url.is_empty()
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must start with http:// or https://",
            });
        }
        if self.input_kind == InputKind::Identifier && self.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "required for identifier input",
            });
        }
        if matches!(&self.cookie, Some(c) if c.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "cookie",
                reason: "must not be blank",
            });
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("skufetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from_path(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
///
/// Returns the path of the file when it was just created. Logging is not set
/// up yet at this point, so callers report it once a subscriber exists.
pub fn load_or_init() -> Result<(FetchConfig, Option<PathBuf>)> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<(FetchConfig, Option<PathBuf>)> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        return Ok((default_cfg, Some(path.to_path_buf())));
    }
    Ok((load_from_path(path)?, None))
}
