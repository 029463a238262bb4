//! Initialize .ripple.toml configuration

use anyhow::Result;
use ripple_core::config::CONFIG_FILE_NAME;
use ripple_core::RippleConfig;
use std::path::{Path, PathBuf};

/// Write a default config into `path`; returns the config path and whether
/// it was created (an existing file is left untouched)
pub fn write_default_config(path: &Path) -> Result<(PathBuf, bool)> {
    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Ok((config_path, false));
    }

    RippleConfig::default().save(&config_path)?;
    Ok((config_path, true))
}

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let (config_path, created) = write_default_config(target_path)?;

    if !created {
        println!("⚠️  {} already exists at {:?}", CONFIG_FILE_NAME, config_path);
        return Ok(());
    }

    println!("✅ Created {} at {:?}", CONFIG_FILE_NAME, config_path);
    println!("\nAdd your path aliases under [resolve.path_aliases], then run:");
    println!("  ripple impact <file>:<function>");

    Ok(())
}
