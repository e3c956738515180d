//! Content layout: where the source card sits on the canvas.
//!
//! The source is scaled with aspect-fill into the padded canvas area
//! (never letterboxed) and centered. The part of the source that falls
//! outside the padded area is cropped; `source_crop` is that visible
//! region in source-local pixels.

use lenscast_frame_model::geometry::{CameraTransform, Point2D, Rect, Size2D};

/// Focus rectangle extent as a fraction of the source width and height.
pub const FOCUS_FRACTION: f64 = 0.4;

/// Smallest focus rectangle side, in source pixels.
pub const MIN_FOCUS_EXTENT: f64 = 1.0;

/// Resolved layout for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLayout {
    /// Canvas size in pixels.
    pub canvas: Size2D,
    /// Source frame size in pixels (at least 1x1).
    pub source: Size2D,
    /// Canvas size minus padding on every side.
    pub padded: Size2D,
    /// Aspect-fill scale from source pixels to canvas pixels.
    pub base_scale: f64,
    /// Padded area, centered on the canvas.
    pub content_rect: Rect,
    /// Source region visible through `content_rect` at `base_scale`.
    pub source_crop: Rect,
}

impl ContentLayout {
    /// Resolve the layout for a source of `source` pixels on `canvas`.
    ///
    /// Degenerate inputs are clamped so the result is always usable:
    /// sizes below one pixel become one pixel.
    pub fn compute(source: Size2D, canvas: Size2D, padding: f64) -> Self {
        let source = at_least_one_pixel(source);
        let canvas = at_least_one_pixel(canvas);
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };

        let padded = Size2D::new(
            (canvas.width - 2.0 * padding).max(1.0),
            (canvas.height - 2.0 * padding).max(1.0),
        );
        let base_scale = (padded.width / source.width).max(padded.height / source.height);

        let content_rect = Rect::centered(Rect::from_size(canvas).center(), padded);
        let crop_size = Size2D::new(
            (padded.width / base_scale).min(source.width),
            (padded.height / base_scale).min(source.height),
        );
        let source_crop = Rect::centered(Rect::from_size(source).center(), crop_size);

        Self {
            canvas,
            source,
            padded,
            base_scale,
            content_rect,
            source_crop,
        }
    }

    /// The unzoomed camera: crop center onto content center at base scale.
    pub fn wide_transform(&self) -> CameraTransform {
        self.transform_centering(self.source_crop.center(), self.base_scale)
    }

    /// Focus rectangle around a source-local anchor, clamped into the source.
    pub fn focus_rect(&self, anchor_local: Point2D) -> Rect {
        let bounds = Rect::from_size(self.source);
        let anchor = if anchor_local.is_finite() {
            anchor_local
        } else {
            bounds.center()
        };
        let size = Size2D::new(
            self.source.width * FOCUS_FRACTION,
            self.source.height * FOCUS_FRACTION,
        );
        let focus = Rect::centered(anchor, size).clamp_within(&bounds);
        if focus.is_degenerate() {
            focus.expanded_to_min(MIN_FOCUS_EXTENT).clamp_within(&bounds)
        } else {
            focus
        }
    }

    /// Zoomed camera that centers `focus` in the content rectangle.
    ///
    /// The zoom factor relative to the wide framing is the smaller of the
    /// crop-to-focus ratios, capped at `max_zoom`. A focus taller or wider
    /// than the visible crop gives a factor below 1, so the whole focus
    /// rectangle fits in the content area.
    pub fn target_transform(&self, focus: &Rect, max_zoom: f64) -> CameraTransform {
        let focus = if focus.is_degenerate() {
            focus.expanded_to_min(MIN_FOCUS_EXTENT)
        } else {
            *focus
        };
        let fit_x = self.source_crop.width / focus.width;
        let fit_y = self.source_crop.height / focus.height;
        let zoom = fit_x.min(fit_y).min(max_zoom);
        self.transform_centering(focus.center(), zoom * self.base_scale)
    }

    fn transform_centering(&self, source_point: Point2D, scale: f64) -> CameraTransform {
        let target = self.content_rect.center();
        CameraTransform::new(
            scale,
            target.x - source_point.x * scale,
            target.y - source_point.y * scale,
        )
    }
}

fn at_least_one_pixel(size: Size2D) -> Size2D {
    let fix = |v: f64| if v.is_finite() { v.max(1.0) } else { 1.0 };
    Size2D::new(fix(size.width), fix(size.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd_layout() -> ContentLayout {
        ContentLayout::compute(
            Size2D::new(1920.0, 1080.0),
            Size2D::new(1920.0, 1080.0),
            50.0,
        )
    }

    #[test]
    fn test_aspect_fill_scale_for_hd_source() {
        let layout = hd_layout();
        assert_eq!(layout.padded, Size2D::new(1820.0, 980.0));
        assert!((layout.base_scale - 1820.0 / 1920.0).abs() < 1e-12);
        assert_eq!(layout.content_rect, Rect::new(50.0, 50.0, 1820.0, 980.0));

        // Width fills exactly; height is cropped, never letterboxed.
        assert!((layout.source_crop.width - 1920.0).abs() < 1e-9);
        assert!(layout.source_crop.height < 1080.0);
        assert!(layout.source_crop.height * layout.base_scale >= 980.0 - 1e-9);
    }

    #[test]
    fn test_wide_transform_maps_crop_onto_content() {
        let layout = hd_layout();
        let wide = layout.wide_transform();
        let mapped = wide.apply_rect(&layout.source_crop);
        assert!((mapped.x - 50.0).abs() < 1e-9);
        assert!((mapped.y - 50.0).abs() < 1e-9);
        assert!((mapped.width - 1820.0).abs() < 1e-9);
        assert!((mapped.height - 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_focus_at_origin_is_clamped_not_negative() {
        let layout = hd_layout();
        let focus = layout.focus_rect(Point2D::ORIGIN);
        assert_eq!(focus.origin(), Point2D::ORIGIN);
        assert!((focus.width - 768.0).abs() < 1e-9);
        assert!((focus.height - 432.0).abs() < 1e-9);
        assert!(Rect::from_size(layout.source).contains_rect(&focus));
    }

    #[test]
    fn test_target_centers_focus_on_content() {
        let layout = hd_layout();
        let focus = layout.focus_rect(Point2D::new(960.0, 540.0));
        let target = layout.target_transform(&focus, 1.25);

        assert!((target.scale - 1.25 * layout.base_scale).abs() < 1e-12);
        let mapped_center = target.apply(focus.center());
        let content_center = layout.content_rect.center();
        assert!((mapped_center.x - content_center.x).abs() < 1e-9);
        assert!((mapped_center.y - content_center.y).abs() < 1e-9);
    }

    #[test]
    fn test_short_canvas_fits_whole_focus() {
        // Wide, short canvas: the crop is a thin band, shorter than the focus.
        let layout =
            ContentLayout::compute(Size2D::new(1920.0, 1080.0), Size2D::new(1920.0, 200.0), 0.0);
        assert!((layout.base_scale - 1.0).abs() < 1e-12);
        assert!((layout.source_crop.height - 200.0).abs() < 1e-9);

        let focus = layout.focus_rect(Point2D::new(960.0, 540.0));
        let target = layout.target_transform(&focus, 1.25);
        let expected = (1920.0 / 768.0_f64).min(200.0 / 432.0).min(1.25) * layout.base_scale;
        assert!((target.scale - expected).abs() < 1e-12);
        assert!(target.scale < layout.base_scale);

        let mapped = target.apply_rect(&focus);
        assert!(mapped.height <= layout.content_rect.height + 1e-9);
    }

    #[test]
    fn test_degenerate_focus_stays_invertible() {
        let layout = hd_layout();
        let target = layout.target_transform(&Rect::new(10.0, 10.0, 0.0, 0.0), 1.25);
        assert!(target.is_invertible());

        let focus = layout.focus_rect(Point2D::new(f64::NAN, 3.0));
        assert!(!focus.is_degenerate());
    }

    #[test]
    fn test_degenerate_source_and_canvas_are_clamped() {
        let layout =
            ContentLayout::compute(Size2D::new(0.0, 0.0), Size2D::new(10.0, 10.0), 40.0);
        assert_eq!(layout.source, Size2D::new(1.0, 1.0));
        assert_eq!(layout.padded, Size2D::new(1.0, 1.0));
        assert!(layout.wide_transform().is_invertible());
    }
}
