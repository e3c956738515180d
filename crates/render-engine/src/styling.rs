//! Source card styling in source-local space: rounded corners and the
//! blurred drop-shadow mask.

use lenscast_frame_model::geometry::{Point2D, Rect};

/// Longest side of the shadow mask grid. The shadow is a low-frequency
/// signal, so it is built coarse and sampled bilinearly.
const MAX_SHADOW_GRID: f64 = 256.0;

/// Signed distance from `p` to a rounded rectangle (negative inside).
pub fn sdf_rounded_rect(p: Point2D, rect: &Rect, radius: f64) -> f64 {
    let c = rect.center();
    let hx = rect.width / 2.0;
    let hy = rect.height / 2.0;
    let r = radius.clamp(0.0, hx.min(hy));
    let qx = (p.x - c.x).abs() - hx + r;
    let qy = (p.y - c.y).abs() - hy + r;
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    outside + qx.max(qy).min(0.0) - r
}

/// Anti-aliased coverage for a signed distance, with `pixels_per_unit`
/// converting to output pixels (one pixel wide edge).
pub fn coverage(distance: f64, pixels_per_unit: f64) -> f32 {
    (0.5 - distance * pixels_per_unit).clamp(0.0, 1.0) as f32
}

/// Identifies a shadow mask so it is rebuilt only when the card changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowKey {
    pub card: Rect,
    pub corner_radius: f64,
    pub blur_radius: f64,
}

/// Blurred rounded-rect alpha mask on a regular grid in source space.
#[derive(Debug, Clone)]
pub struct ShadowMask {
    origin: Point2D,
    cell: f64,
    width: usize,
    height: usize,
    alpha: Vec<f32>,
}

impl ShadowMask {
    /// Build the mask for `key.card`, padded by the blur radius on every side.
    pub fn build(key: &ShadowKey) -> Self {
        let margin = key.blur_radius.max(0.0) * 1.5;
        let extent = Rect::new(
            key.card.x - margin,
            key.card.y - margin,
            key.card.width + 2.0 * margin,
            key.card.height + 2.0 * margin,
        );
        let cell = (extent.width.max(extent.height) / MAX_SHADOW_GRID).max(1.0);
        let width = (extent.width / cell).ceil() as usize + 1;
        let height = (extent.height / cell).ceil() as usize + 1;

        let mut alpha = Vec::with_capacity(width * height);
        for gy in 0..height {
            for gx in 0..width {
                let p = Point2D::new(
                    extent.x + (gx as f64 + 0.5) * cell,
                    extent.y + (gy as f64 + 0.5) * cell,
                );
                let d = sdf_rounded_rect(p, &key.card, key.corner_radius);
                alpha.push(coverage(d, 1.0 / cell));
            }
        }

        let blur_cells = key.blur_radius / cell;
        let radius = blur_cells.ceil() as usize;
        let alpha = gaussian_blur(&alpha, width, height, radius, blur_cells / 2.0);

        Self {
            origin: extent.origin(),
            cell,
            width,
            height,
            alpha,
        }
    }

    /// Bilinear sample at a source-space point; zero outside the grid.
    pub fn sample(&self, p: Point2D) -> f32 {
        let fx = (p.x - self.origin.x) / self.cell - 0.5;
        let fy = (p.y - self.origin.y) / self.cell - 0.5;
        if fx < -1.0 || fy < -1.0 || fx > self.width as f64 || fy > self.height as f64 {
            return 0.0;
        }
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = (fx - x0) as f32;
        let ty = (fy - y0) as f32;
        let at = |x: f64, y: f64| -> f32 {
            if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
                0.0
            } else {
                self.alpha[y as usize * self.width + x as usize]
            }
        };
        let top = at(x0, y0) * (1.0 - tx) + at(x0 + 1.0, y0) * tx;
        let bottom = at(x0, y0 + 1.0) * (1.0 - tx) + at(x0 + 1.0, y0 + 1.0) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Separable Gaussian blur of a single-channel grid. Edges are treated
/// as transparent so the shadow fades out instead of smearing.
pub fn gaussian_blur(
    src: &[f32],
    width: usize,
    height: usize,
    radius: usize,
    sigma: f64,
) -> Vec<f32> {
    if radius == 0 || !sigma.is_finite() || sigma <= 0.0 {
        return src.to_vec();
    }
    let kernel = gaussian_kernel(radius, sigma);
    let r = radius as isize;

    let mut tmp = vec![0.0f32; src.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - r;
                if sx >= 0 && (sx as usize) < width {
                    acc += w * src[y * width + sx as usize];
                }
            }
            tmp[y * width + x] = acc;
        }
    }

    let mut out = vec![0.0f32; src.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let sy = y as isize + k as isize - r;
                if sy >= 0 && (sy as usize) < height {
                    acc += w * tmp[sy as usize * width + x];
                }
            }
            out[y * width + x] = acc;
        }
    }
    out
}

fn gaussian_kernel(radius: usize, sigma: f64) -> Vec<f32> {
    let r = radius as isize;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| (-(i * i) as f64 / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdf_signs() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(sdf_rounded_rect(Point2D::new(50.0, 25.0), &rect, 10.0) < 0.0);
        assert!(sdf_rounded_rect(Point2D::new(150.0, 25.0), &rect, 10.0) > 0.0);
        // The square corner is outside once rounded.
        assert!(sdf_rounded_rect(Point2D::new(0.5, 0.5), &rect, 10.0) > 0.0);
        assert!(sdf_rounded_rect(Point2D::new(0.5, 0.5), &rect, 0.0) < 0.0);
    }

    #[test]
    fn test_blur_preserves_constant_interior() {
        let src = vec![1.0f32; 21 * 21];
        let out = gaussian_blur(&src, 21, 21, 3, 1.5);
        assert!((out[10 * 21 + 10] - 1.0).abs() < 1e-5);
        assert!(out[0] < 1.0);
    }

    #[test]
    fn test_blur_spreads_single_cell() {
        let mut src = vec![0.0f32; 9 * 9];
        src[4 * 9 + 4] = 1.0;
        let out = gaussian_blur(&src, 9, 9, 2, 1.0);
        let total: f32 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(out[4 * 9 + 4] < 1.0);
        assert!(out[4 * 9 + 5] > 0.0);
    }

    #[test]
    fn test_shadow_mask_fades_outside_card() {
        let key = ShadowKey {
            card: Rect::new(0.0, 0.0, 200.0, 100.0),
            corner_radius: 8.0,
            blur_radius: 12.0,
        };
        let mask = ShadowMask::build(&key);
        assert!(mask.sample(Point2D::new(100.0, 50.0)) > 0.95);
        let edge = mask.sample(Point2D::new(200.0, 50.0));
        assert!(edge > 0.2 && edge < 0.8);
        assert_eq!(mask.sample(Point2D::new(1_000.0, 50.0)), 0.0);
    }
}
