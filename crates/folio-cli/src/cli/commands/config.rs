//! `folio config` handlers. Each takes the resolved config file path.

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::config::Config;

pub fn path(config_path: &Path) {
    println!("{}", config_path.display());
}

pub fn init(config_path: &Path) -> Result<()> {
    Config::init(config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    println!("Set posts_source there to run `folio posts list` without --source.");
    Ok(())
}

pub fn generate() -> Result<()> {
    print!("{}", Config::generate()?);
    Ok(())
}
