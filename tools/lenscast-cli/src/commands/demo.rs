//! Live session demo on synthetic frames.
//!
//! Drives a [`FocusSession`] with a scripted input backend (a built-in
//! click sequence, or a JSONL event script) and writes every Nth composed
//! frame as a PNG.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgba, RgbaImage};
use lenscast_common::clock::RateController;
use lenscast_common::config::AppConfig;
use lenscast_frame_model::event::{parse_events, InputEvent, TimestampNs};
use lenscast_frame_model::geometry::{Point2D, SourceGeometry};
use lenscast_input_tracker::backends::StubBackend;
use lenscast_live_session::{FocusSession, SessionConfig};
use lenscast_render_engine::VideoFrame;

use super::load_render_config;

const SOURCE_WIDTH: u32 = 1280;
const SOURCE_HEIGHT: u32 = 720;

pub async fn run(
    app: &AppConfig,
    output: PathBuf,
    seconds: f64,
    every: u64,
    render: Option<PathBuf>,
    script: Option<PathBuf>,
) -> anyhow::Result<()> {
    let render = load_render_config(app, render.as_deref())?.sanitized();
    let events = match script {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading event script {}", path.display()))?;
            parse_events(&text).context("parsing event script")?
        }
        None => default_script(),
    };
    std::fs::create_dir_all(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    let geometry = SourceGeometry::unscaled(SOURCE_WIDTH, SOURCE_HEIGHT);
    let mut session = FocusSession::new(SessionConfig::from_app(app, geometry));
    let backend = StubBackend::new(events)
        .with_position(Point2D::new(SOURCE_WIDTH as f64 / 2.0, SOURCE_HEIGHT as f64 / 2.0));
    let status = session.start(Box::new(backend), &render)?;
    println!("Input: {status:?}");

    let rate = RateController::new(app.capture.fps.max(1));
    let mut ticker = tokio::time::interval(rate.interval());
    let total_frames = (seconds.max(0.0) * app.capture.fps.max(1) as f64).ceil() as u64;
    let every = every.max(1);
    let mut written = 0usize;

    for index in 0..total_frames {
        ticker.tick().await;
        let pts = session.clock().elapsed_ns();
        let frame = VideoFrame::new(synthetic_frame(pts), pts);
        let Some(out) = session.process_frame(&frame, &render, render.canvas) else {
            tracing::warn!(frame = index, "Frame dropped");
            continue;
        };
        if index % every == 0 {
            let path = snapshot_path(&output, index);
            out.image
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            written += 1;
        }
    }

    let stats = session.stop().await?;
    let camera = session.camera();
    println!(
        "Frames: {} composed, {} dropped, {} snapshots in {}",
        session.compositor().frames_composed(),
        session.compositor().frames_dropped(),
        written,
        output.display()
    );
    println!(
        "Zoom cycles: {} started, {} completed, {} triggers discarded",
        camera.cycles_started(),
        camera.cycles_completed(),
        camera.triggers_discarded()
    );
    if let Some(stats) = stats {
        println!(
            "Input: {} events, {} samples, {} triggers",
            stats.events, stats.samples, stats.triggers
        );
    }
    Ok(())
}

/// Glide toward the upper-left quadrant and click, then click again
/// mid-cycle (discarded), then click bottom-right after the cycle ends.
fn default_script() -> Vec<InputEvent> {
    let ms = |v: u64| -> TimestampNs { v * 1_000_000 };
    let mut events = Vec::new();
    for step in 0..20u64 {
        let t = step as f64 / 19.0;
        events.push(InputEvent::moved(
            ms(100 + step * 20),
            640.0 - 320.0 * t,
            360.0 - 180.0 * t,
        ));
    }
    events.push(InputEvent::left_down(ms(600)));
    events.push(InputEvent::left_up(ms(680)));
    events.push(InputEvent::left_down(ms(1200)));
    events.push(InputEvent::left_up(ms(1260)));
    events.push(InputEvent::moved(ms(3300), 1000.0, 560.0));
    events.push(InputEvent::left_down(ms(3400)));
    events.push(InputEvent::left_up(ms(3460)));
    events
}

/// A labelled grid that scrolls slowly, so zoom and motion are visible.
fn synthetic_frame(pts: TimestampNs) -> RgbaImage {
    let shift = (pts / 10_000_000) as u32;
    RgbaImage::from_fn(SOURCE_WIDTH, SOURCE_HEIGHT, |x, y| {
        let gx = (x + shift) % 80;
        let gy = y % 80;
        if gx < 2 || gy < 2 {
            Rgba([40, 40, 48, 255])
        } else {
            let r = (x * 255 / SOURCE_WIDTH) as u8;
            let b = (y * 255 / SOURCE_HEIGHT) as u8;
            Rgba([r / 2 + 100, 200, b / 2 + 100, 255])
        }
    })
}

fn snapshot_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}
