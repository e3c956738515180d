pub mod check;
pub mod config;
pub mod cycle;
pub mod demo;

use std::path::Path;

use anyhow::Context;
use lenscast_common::config::AppConfig;
use lenscast_frame_model::render::RenderConfiguration;

/// Render configuration from `explicit`, else the app config's path, else defaults.
pub fn load_render_config(
    app: &AppConfig,
    explicit: Option<&Path>,
) -> anyhow::Result<RenderConfiguration> {
    match explicit.or(app.capture.render_config.as_deref()) {
        Some(path) => RenderConfiguration::load(path)
            .with_context(|| format!("loading render config {}", path.display())),
        None => Ok(RenderConfiguration::default()),
    }
}
