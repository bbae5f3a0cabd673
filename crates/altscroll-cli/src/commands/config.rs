use std::path::Path;

use anyhow::Result;
use tracing::info;

use altscroll_core::AppConfig;

pub fn run(config: &AppConfig, explicit: Option<&Path>, path_only: bool, init: bool) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path);
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            config.save_to(&path)?;
            info!("Wrote default config to {}", path.display());
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
