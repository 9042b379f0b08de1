//! `skufetch config` – show where config is read from and its effective values.

use anyhow::Result;
use skufetch_core::config::{self, FetchConfig};
use std::path::Path;

pub fn run_show_config(explicit: Option<&Path>, cfg: &FetchConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if let Err(e) = cfg.validate() {
        println!("# warning: {}", e);
    }
    Ok(())
}
