//! Geometry types for layout and camera framing.
//!
//! `(0, 0)` is the top-left corner and `y` grows downward in every space.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build from integer pixel dimensions.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when either side is zero, negative, or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size anchored at the origin.
    pub fn from_size(size: Size2D) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Rectangle of the given size centered at `center`.
    pub fn centered(center: Point2D, size: Size2D) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn origin(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if a point lies inside (edges inclusive).
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check if `other` lies fully inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Shift the origin so the rectangle lies within `bounds`.
    ///
    /// Size is preserved. A rectangle larger than `bounds` on an axis is
    /// pinned to the bounds origin on that axis.
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let max_x = (bounds.right() - self.width).max(bounds.x);
        let max_y = (bounds.bottom() - self.height).max(bounds.y);
        Rect::new(
            self.x.clamp(bounds.x, max_x),
            self.y.clamp(bounds.y, max_y),
            self.width,
            self.height,
        )
    }

    /// Grow each side to at least `min_extent`, keeping the center fixed.
    pub fn expanded_to_min(&self, min_extent: f64) -> Rect {
        let width = if self.width.is_finite() {
            self.width.max(min_extent)
        } else {
            min_extent
        };
        let height = if self.height.is_finite() {
            self.height.max(min_extent)
        } else {
            min_extent
        };
        Rect::centered(self.center(), Size2D::new(width, height))
    }

    pub fn is_degenerate(&self) -> bool {
        self.size().is_degenerate()
    }
}

/// Uniform-scale affine map from source-frame pixels to canvas pixels.
///
/// `canvas = source * scale + (tx, ty)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl CameraTransform {
    pub const IDENTITY: CameraTransform = CameraTransform {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(scale: f64, tx: f64, ty: f64) -> Self {
        Self { scale, tx, ty }
    }

    /// Map a source-space point into canvas space.
    pub fn apply(&self, p: Point2D) -> Point2D {
        Point2D::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Map a source-space rectangle into canvas space.
    pub fn apply_rect(&self, r: &Rect) -> Rect {
        let origin = self.apply(r.origin());
        Rect::new(
            origin.x,
            origin.y,
            r.width * self.scale,
            r.height * self.scale,
        )
    }

    /// The inverse map, or `None` when the scale is zero or not finite.
    pub fn invert(&self) -> Option<CameraTransform> {
        if !self.is_invertible() {
            return None;
        }
        let inv = 1.0 / self.scale;
        Some(CameraTransform::new(inv, -self.tx * inv, -self.ty * inv))
    }

    pub fn is_invertible(&self) -> bool {
        self.scale.is_finite()
            && self.scale.abs() > f64::EPSILON
            && self.tx.is_finite()
            && self.ty.is_finite()
    }

    /// Component-wise interpolation. `t` is clamped to `[0, 1]`; the
    /// endpoints are returned exactly at `t == 0` and `t == 1`.
    pub fn lerp(a: &CameraTransform, b: &CameraTransform, t: f64) -> CameraTransform {
        if t <= 0.0 {
            return *a;
        }
        if t >= 1.0 {
            return *b;
        }
        CameraTransform {
            scale: a.scale + (b.scale - a.scale) * t,
            tx: a.tx + (b.tx - a.tx) * t,
            ty: a.ty + (b.ty - a.ty) * t,
        }
    }

    /// Compare within an absolute tolerance on every component.
    pub fn approx_eq(&self, other: &CameraTransform, tolerance: f64) -> bool {
        (self.scale - other.scale).abs() <= tolerance
            && (self.tx - other.tx).abs() <= tolerance
            && (self.ty - other.ty).abs() <= tolerance
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Where the captured source sits on the desktop.
///
/// `bounds` is in screen space (the input source's units); `pixel_size`
/// is the size of the frames the capture collaborator delivers. The two
/// differ on scaled displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceGeometry {
    pub bounds: Rect,
    pub pixel_size: Size2D,
}

impl SourceGeometry {
    pub fn new(bounds: Rect, pixel_size: Size2D) -> Self {
        Self { bounds, pixel_size }
    }

    /// A source whose screen bounds coincide with its pixel grid.
    pub fn unscaled(width: u32, height: u32) -> Self {
        let size = Size2D::from_pixels(width, height);
        Self::new(Rect::from_size(size), size)
    }

    /// Convert a screen-space point into source-local pixel coordinates.
    ///
    /// Points outside the source map outside `[0, pixel_size]`; callers clamp.
    pub fn to_source_local(&self, p: Point2D) -> Point2D {
        let sx = if self.bounds.width > 0.0 {
            self.pixel_size.width / self.bounds.width
        } else {
            1.0
        };
        let sy = if self.bounds.height > 0.0 {
            self.pixel_size.height / self.bounds.height
        } else {
            1.0
        };
        Point2D::new((p.x - self.bounds.x) * sx, (p.y - self.bounds.y) * sy)
    }

    /// The same source delivered at a different frame resolution.
    pub fn with_pixel_size(&self, pixel_size: Size2D) -> Self {
        Self::new(self.bounds, pixel_size)
    }
}
