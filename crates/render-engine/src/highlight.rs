//! Cursor halo overlay.

use image::RgbaImage;
use lenscast_frame_model::geometry::Point2D;
use lenscast_frame_model::render::Rgba8;

/// Draw a radial halo centered at `center` (canvas pixels).
///
/// Alpha falls off quadratically from `color.a` at the center to zero at
/// `radius`.
pub fn draw_halo(frame: &mut RgbaImage, center: Point2D, radius: f64, color: Rgba8) {
    if radius.is_nan() || radius <= 0.0 || !center.is_finite() || color.a == 0 {
        return;
    }
    let (w, h) = frame.dimensions();
    let min_x = (center.x - radius).floor().max(0.0) as u32;
    let min_y = (center.y - radius).floor().max(0.0) as u32;
    let max_x = ((center.x + radius).ceil().min(w as f64)).max(0.0) as u32;
    let max_y = ((center.y + radius).ceil().min(h as f64)).max(0.0) as u32;
    let base_alpha = color.a as f32 / 255.0;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            let dist = dx.hypot(dy);
            if dist >= radius {
                continue;
            }
            let falloff = (1.0 - dist / radius) as f32;
            let alpha = base_alpha * falloff * falloff;
            if alpha > 0.004 {
                blend_pixel(frame, x, y, color, alpha);
            }
        }
    }
}

/// Source-over blend of an opaque color at `alpha` onto an opaque pixel.
pub(crate) fn blend_pixel(frame: &mut RgbaImage, x: u32, y: u32, color: Rgba8, alpha: f32) {
    let px = frame.get_pixel_mut(x, y);
    let inv = 1.0 - alpha;
    px.0[0] = (color.r as f32 * alpha + px.0[0] as f32 * inv).round() as u8;
    px.0[1] = (color.g as f32 * alpha + px.0[1] as f32 * inv).round() as u8;
    px.0[2] = (color.b as f32 * alpha + px.0[2] as f32 * inv).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_halo_is_strongest_at_center() {
        let mut frame = RgbaImage::from_pixel(21, 21, Rgba([0, 0, 0, 255]));
        draw_halo(&mut frame, Point2D::new(10.5, 10.5), 8.0, Rgba8::new(255, 255, 255, 255));

        let center = frame.get_pixel(10, 10).0[0];
        let near = frame.get_pixel(13, 10).0[0];
        let outside = frame.get_pixel(0, 0).0[0];
        assert_eq!(center, 255);
        assert!(near < center && near > 0);
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_halo_clipped_at_frame_edge() {
        let mut frame = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        draw_halo(&mut frame, Point2D::new(-2.0, -2.0), 5.0, Rgba8::new(255, 0, 0, 255));
        assert!(frame.get_pixel(0, 0).0[0] > 0);
        draw_halo(&mut frame, Point2D::new(f64::NAN, 0.0), 5.0, Rgba8::WHITE);
    }
}
