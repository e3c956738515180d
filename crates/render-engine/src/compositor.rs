//! Frame compositor: background, shadow, styled source, cursor halo.
//!
//! Layers are composited bottom to top in canvas space. The source card
//! and its shadow are defined in source-local space and reach the canvas
//! through the camera transform; the cursor halo always uses the wide
//! (unzoomed) transform.

use image::imageops::FilterType;
use image::RgbaImage;
use rayon::prelude::*;
use lenscast_frame_model::geometry::{CameraTransform, Point2D, Rect, Size2D};
use lenscast_frame_model::render::{CanvasSize, RenderConfiguration};
use lenscast_processing_core::layout::ContentLayout;

use crate::background::BackgroundCache;
use crate::frame::VideoFrame;
use crate::highlight::draw_halo;
use crate::styling::{coverage, sdf_rounded_rect, ShadowKey, ShadowMask};

/// Downward shadow offset in canvas pixels.
pub const SHADOW_OFFSET_PX: f64 = 6.0;

/// Peak shadow opacity under the card.
pub const SHADOW_OPACITY: f32 = 0.45;

/// Frames larger than this many bytes are dropped rather than allocated.
pub const MAX_FRAME_BYTES: u64 = 1 << 30;

/// Per-frame compositor. Holds only caches; the output depends solely on
/// the frame, transform, and configuration passed in.
#[derive(Debug, Default)]
pub struct FrameCompositor {
    background: BackgroundCache,
    shadow: Option<(ShadowKey, ShadowMask)>,
    frames_composed: u64,
    frames_dropped: u64,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout the compositor uses for a frame of `frame_size` under `config`.
    pub fn layout_for(frame_size: Size2D, config: &RenderConfiguration) -> ContentLayout {
        ContentLayout::compute(frame_size, config.canvas.to_size(), config.padding)
    }

    pub fn frames_composed(&self) -> u64 {
        self.frames_composed
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Compose one output frame of exactly `target` pixels.
    ///
    /// `cursor` is the pointer in source-local pixels, used for the halo.
    /// Returns `None` (the frame is dropped) only when the output buffer
    /// cannot be allocated.
    pub fn compose(
        &mut self,
        frame: &VideoFrame,
        transform: &CameraTransform,
        config: &RenderConfiguration,
        target: CanvasSize,
        cursor: Option<Point2D>,
    ) -> Option<VideoFrame> {
        let config = config.sanitized();
        let canvas = config.canvas;
        if !fits_budget(canvas) || !fits_budget(target) || target.width == 0 || target.height == 0
        {
            self.frames_dropped += 1;
            tracing::warn!(
                canvas_w = canvas.width,
                canvas_h = canvas.height,
                target_w = target.width,
                target_h = target.height,
                "Output buffer too large, dropping frame"
            );
            return None;
        }

        let layout = Self::layout_for(frame.size(), &config);
        let transform = if transform.is_invertible() {
            *transform
        } else {
            tracing::warn!(scale = transform.scale, "Camera transform not invertible, using wide");
            layout.wide_transform()
        };

        let mut out = self
            .background
            .get(&config.background, canvas.width, canvas.height)
            .clone();

        if !frame.is_empty() {
            self.draw_card(&mut out, frame, &layout, &transform, &config);
        }

        if config.cursor_highlight.enabled {
            if let Some(cursor) = cursor {
                let center = layout.wide_transform().apply(cursor);
                let halo = config.cursor_highlight;
                draw_halo(&mut out, center, halo.radius, halo.color);
            }
        }

        if target != canvas {
            out = image::imageops::resize(&out, target.width, target.height, FilterType::Triangle);
        }

        self.frames_composed += 1;
        Some(VideoFrame::new(out, frame.pts_ns))
    }

    /// Shadow and rounded source card, through `transform`.
    fn draw_card(
        &mut self,
        out: &mut RgbaImage,
        frame: &VideoFrame,
        layout: &ContentLayout,
        transform: &CameraTransform,
        config: &RenderConfiguration,
    ) {
        let Some(inverse) = transform.invert() else {
            return;
        };
        let card = layout.source_crop;
        let corner = config.corner_radius / layout.base_scale;
        let blur = config.shadow_radius / layout.base_scale;

        let shadow = if blur > 0.0 {
            let key = ShadowKey {
                card,
                corner_radius: corner,
                blur_radius: blur,
            };
            if self.shadow.as_ref().map(|(k, _)| *k != key).unwrap_or(true) {
                self.shadow = Some((key, ShadowMask::build(&key)));
            }
            self.shadow.as_ref().map(|(_, mask)| mask)
        } else {
            None
        };

        let margin = blur * 1.5;
        let reach = transform.apply_rect(&Rect::new(
            card.x - margin,
            card.y - margin,
            card.width + 2.0 * margin,
            card.height + 2.0 * margin,
        ));
        let (w, h) = out.dimensions();
        let x0 = reach.x.floor().clamp(0.0, w as f64) as usize;
        let x1 = reach.right().ceil().clamp(0.0, w as f64) as usize;
        let y0 = reach.y.floor().clamp(0.0, h as f64) as usize;
        let y1 = (reach.bottom() + SHADOW_OFFSET_PX).ceil().clamp(0.0, h as f64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let edge = CardEdge::new(card, corner, transform.scale);
        let source = SourceSampler::new(&frame.image, &card);
        let stride = w as usize * 4;
        let raw: &mut [u8] = out;
        let rows = &mut raw[y0 * stride..y1 * stride];

        rows.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(i, row)| {
                let cy = (y0 + i) as f64 + 0.5;
                let sy = cy * inverse.scale + inverse.ty;
                let shadow_sy = (cy - SHADOW_OFFSET_PX) * inverse.scale + inverse.ty;
                let solid = edge.solid_span(sy);

                for x in x0..x1 {
                    let sx = (x as f64 + 0.5) * inverse.scale + inverse.tx;
                    let px = &mut row[x * 4..x * 4 + 4];

                    let cov = match solid {
                        Some((lo, hi)) if sx >= lo && sx <= hi => 1.0,
                        _ => edge.coverage(Point2D::new(sx, sy)),
                    };
                    let src = (cov > 0.0).then(|| source.sample(sx, sy));
                    let a = src.map_or(0.0, |src| cov * src[3] / 255.0);

                    // Shadow only shows where the card is not opaque.
                    if a < 1.0 {
                        if let Some(mask) = shadow {
                            let sa = mask.sample(Point2D::new(sx, shadow_sy)) * SHADOW_OPACITY;
                            if sa > 0.0 {
                                for c in &mut px[..3] {
                                    *c = (*c as f32 * (1.0 - sa)).round() as u8;
                                }
                            }
                        }
                    }

                    if let Some(src) = src {
                        for c in 0..3 {
                            px[c] = (src[c] * a + px[c] as f32 * (1.0 - a)).round() as u8;
                        }
                        px[3] = 255;
                    }
                }
            });
    }
}

fn fits_budget(size: CanvasSize) -> bool {
    (size.width as u64)
        .checked_mul(size.height as u64)
        .and_then(|px| px.checked_mul(4))
        .is_some_and(|bytes| bytes <= MAX_FRAME_BYTES)
}

/// Rounded card outline in source space, with the span of each row that
/// is fully covered so interior pixels skip the distance evaluation.
struct CardEdge {
    card: Rect,
    corner: f64,
    scale: f64,
    /// Source-space distance inside the edge at which coverage reaches 1.
    solid_inset: f64,
}

impl CardEdge {
    fn new(card: Rect, corner: f64, scale: f64) -> Self {
        let half_min = (card.width / 2.0).min(card.height / 2.0);
        Self {
            card,
            corner: corner.clamp(0.0, half_min.max(0.0)),
            scale,
            solid_inset: 0.5 / scale,
        }
    }

    fn coverage(&self, p: Point2D) -> f32 {
        coverage(sdf_rounded_rect(p, &self.card, self.corner), self.scale)
    }

    /// Source x range of row `sy` with full coverage. Rows that cross a
    /// rounded corner return `None` and fall back to the per-pixel path.
    fn solid_span(&self, sy: f64) -> Option<(f64, f64)> {
        let c = self.card.center();
        let hx = self.card.width / 2.0;
        let hy = self.card.height / 2.0;
        if (sy - c.y).abs() > hy - self.corner.max(self.solid_inset) {
            return None;
        }
        let half = hx - self.solid_inset;
        (half > 0.0).then(|| (c.x - half, c.x + half))
    }
}

/// Bilinear sampler over the raw source buffer, clamped to the visible
/// crop so pixels outside it never bleed in.
struct SourceSampler<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
    x_span: (f64, f64),
    y_span: (f64, f64),
}

impl<'a> SourceSampler<'a> {
    fn new(img: &'a RgbaImage, crop: &Rect) -> Self {
        let (w, h) = img.dimensions();
        Self {
            pixels: img.as_raw(),
            width: w as usize,
            height: h as usize,
            x_span: (crop.x.max(0.0) + 0.5, crop.right().min(w as f64) - 0.5),
            y_span: (crop.y.max(0.0) + 0.5, crop.bottom().min(h as f64) - 0.5),
        }
    }

    fn sample(&self, x: f64, y: f64) -> [f32; 4] {
        let fx = clamp_span(x, self.x_span.0, self.x_span.1) - 0.5;
        let fy = clamp_span(y, self.y_span.0, self.y_span.1) - 0.5;

        let x0 = (fx.floor().max(0.0) as usize).min(self.width - 1);
        let y0 = (fy.floor().max(0.0) as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = (fx - x0 as f64).clamp(0.0, 1.0) as f32;
        let ty = (fy - y0 as f64).clamp(0.0, 1.0) as f32;

        let at = |x: usize, y: usize| {
            let i = (y * self.width + x) * 4;
            &self.pixels[i..i + 4]
        };
        let (a, b, c, d) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));

        let mut out = [0.0f32; 4];
        for i in 0..4 {
            let top = a[i] as f32 * (1.0 - tx) + b[i] as f32 * tx;
            let bottom = c[i] as f32 * (1.0 - tx) + d[i] as f32 * tx;
            out[i] = top * (1.0 - ty) + bottom * ty;
        }
        out
    }
}

/// Clamp into `[lo, hi]`; a span narrower than one pixel pins to its middle.
fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}
