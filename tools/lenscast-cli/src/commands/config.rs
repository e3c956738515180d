//! Print or write configuration.

use std::path::PathBuf;

use lenscast_common::config::{config_file_path, AppConfig};

use super::load_render_config;

pub fn run(app: &AppConfig, render: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    if write {
        let defaults = AppConfig::default();
        defaults.save()?;
        println!("Wrote {}", config_file_path().display());
        return Ok(());
    }

    let render = load_render_config(app, render.as_deref())?;
    println!("# app config ({})", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(app)?);
    println!("# render config");
    println!("{}", serde_json::to_string_pretty(&render)?);
    Ok(())
}
