//! Fallback for platforms without a native input backend.

use lenscast_frame_model::geometry::Rect;

use super::NullBackend;
use crate::InputBackend;

pub fn detect_best_backend(_bounds: Rect) -> Box<dyn InputBackend> {
    tracing::warn!(
        "Input hook backends for this platform are not implemented yet; using degraded null backend"
    );
    Box::new(NullBackend::new("unsupported platform"))
}
