//! Background layer: solid, gradient, or image, cached per canvas.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use lenscast_common::error::{LenscastError, LenscastResult};
use lenscast_frame_model::render::{BackgroundSpec, Rgba8};

/// Render `spec` at `width`x`height`.
pub fn render_background(
    spec: &BackgroundSpec,
    width: u32,
    height: u32,
) -> LenscastResult<RgbaImage> {
    match spec {
        BackgroundSpec::Solid { color } => Ok(solid(*color, width, height)),
        BackgroundSpec::Gradient { start, end } => Ok(gradient(*start, *end, width, height)),
        BackgroundSpec::Image { path } => {
            let img = image::open(path).map_err(|e| {
                LenscastError::render(format!(
                    "failed to load background image {}: {e}",
                    path.display()
                ))
            })?;
            Ok(img
                .resize_to_fill(width, height, FilterType::Triangle)
                .to_rgba8())
        }
    }
}

fn solid(color: Rgba8, width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color.to_array()))
}

/// Diagonal two-stop gradient; `start` at the top-left corner.
fn gradient(start: Rgba8, end: Rgba8, width: u32, height: u32) -> RgbaImage {
    let span_x = (width.max(2) - 1) as f32;
    let span_y = (height.max(2) - 1) as f32;
    let a = start.to_array();
    let b = end.to_array();
    RgbaImage::from_fn(width, height, |x, y| {
        let t = (x as f32 / span_x + y as f32 / span_y) * 0.5;
        let mut px = [0u8; 4];
        for c in 0..4 {
            px[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * t).round() as u8;
        }
        Rgba(px)
    })
}

/// Keeps the last rendered background until its spec or size changes.
#[derive(Debug, Default)]
pub struct BackgroundCache {
    key: Option<(BackgroundSpec, u32, u32)>,
    image: RgbaImage,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background for this frame. Construction failures fall back to black
    /// (and are cached too, so a broken image path is not retried per frame).
    pub fn get(&mut self, spec: &BackgroundSpec, width: u32, height: u32) -> &RgbaImage {
        let fresh = matches!(&self.key, Some((s, w, h)) if s == spec && *w == width && *h == height);
        if !fresh {
            self.image = render_background(spec, width, height).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Background unavailable, using black");
                solid(Rgba8::BLACK, width, height)
            });
            self.key = Some((spec.clone(), width, height));
        }
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_gradient_corners() {
        let start = Rgba8::opaque(0, 0, 0);
        let end = Rgba8::opaque(200, 100, 50);
        let img = render_background(&BackgroundSpec::Gradient { start, end }, 5, 3).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(4, 2).0, [200, 100, 50, 255]);
        assert_eq!(img.get_pixel(2, 1).0, [100, 50, 25, 255]);
    }

    #[test]
    fn test_missing_image_falls_back_to_black() {
        let spec = BackgroundSpec::Image {
            path: PathBuf::from("/nonexistent/lenscast-background.png"),
        };
        assert!(render_background(&spec, 4, 4).is_err());

        let mut cache = BackgroundCache::new();
        let img = cache.get(&spec, 4, 4);
        assert_eq!(img.dimensions(), (4, 4));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_image_background_fills_canvas() {
        let path = std::env::temp_dir().join(format!("lenscast-bg-{}.png", std::process::id()));
        RgbaImage::from_pixel(8, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let img = render_background(&BackgroundSpec::Image { path: path.clone() }, 6, 6).unwrap();
        assert_eq!(img.dimensions(), (6, 6));
        let px = img.get_pixel(3, 3).0;
        for (got, want) in px.iter().zip([10u8, 20, 30, 255]) {
            assert!(got.abs_diff(want) <= 1);
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_cache_rebuilds_on_change() {
        let mut cache = BackgroundCache::new();
        let red = BackgroundSpec::Solid {
            color: Rgba8::opaque(255, 0, 0),
        };
        let blue = BackgroundSpec::Solid {
            color: Rgba8::opaque(0, 0, 255),
        };
        assert_eq!(cache.get(&red, 2, 2).get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(cache.get(&red, 3, 2).dimensions(), (3, 2));
        assert_eq!(cache.get(&blue, 3, 2).get_pixel(1, 1).0, [0, 0, 255, 255]);
    }
}
