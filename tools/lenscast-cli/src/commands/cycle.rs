//! Print one zoom cycle.

use lenscast_frame_model::geometry::{Point2D, Size2D, SourceGeometry};
use lenscast_frame_model::render::RenderConfiguration;
use lenscast_processing_core::camera::{CameraTiming, FrameContext};
use lenscast_processing_core::camera_preview::simulate_zoom_cycle;
use lenscast_processing_core::layout::ContentLayout;

pub fn run(
    x: f64,
    y: f64,
    width: u32,
    height: u32,
    fps: f64,
    strength: Option<f64>,
) -> anyhow::Result<()> {
    let mut render = RenderConfiguration::default();
    if let Some(strength) = strength {
        render.zoom.strength = strength;
    }
    let render = render.sanitized();

    let layout = ContentLayout::compute(
        Size2D::from_pixels(width, height),
        render.canvas.to_size(),
        render.padding,
    );
    let ctx = FrameContext::new(layout, SourceGeometry::unscaled(width, height), &render.zoom);
    let frames = simulate_zoom_cycle(&ctx, Point2D::new(x, y), CameraTiming::default(), fps);

    println!("{:>8}  {:<11}  transform", "t (s)", "phase");
    for frame in &frames {
        println!(
            "{:>8.3}  {:<11}  {}",
            frame.time_secs,
            format!("{:?}", frame.phase),
            frame.css_transform()
        );
    }
    Ok(())
}
