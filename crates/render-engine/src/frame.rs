//! Video frames exchanged with the capture collaborator.

use image::RgbaImage;
use lenscast_common::error::{LenscastError, LenscastResult};
use lenscast_frame_model::event::TimestampNs;
use lenscast_frame_model::geometry::Size2D;

/// One RGBA frame and its presentation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub image: RgbaImage,
    pub pts_ns: TimestampNs,
}

impl VideoFrame {
    pub fn new(image: RgbaImage, pts_ns: TimestampNs) -> Self {
        Self { image, pts_ns }
    }

    /// Convert a BGRA capture buffer (rows `stride` bytes apart).
    pub fn from_bgra(
        width: u32,
        height: u32,
        stride: usize,
        data: &[u8],
        pts_ns: TimestampNs,
    ) -> LenscastResult<Self> {
        let row_bytes = width as usize * 4;
        if stride < row_bytes {
            return Err(LenscastError::render(format!(
                "stride {stride} shorter than row of {row_bytes} bytes"
            )));
        }
        let needed = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row_bytes,
        };
        if data.len() < needed {
            return Err(LenscastError::render(format!(
                "BGRA buffer has {} bytes, {width}x{height} needs {needed}",
                data.len()
            )));
        }

        let mut rgba = Vec::with_capacity(row_bytes * height as usize);
        for row in data.chunks(stride).take(height as usize) {
            for px in row[..row_bytes].chunks_exact(4) {
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }
        let image = RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| LenscastError::render("BGRA conversion produced a short buffer"))?;
        Ok(Self::new(image, pts_ns))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size2D {
        Size2D::from_pixels(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
