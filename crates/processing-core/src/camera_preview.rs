//! Camera motion preview helpers.
//!
//! Runs one zoom cycle through a private [`CameraStateMachine`] and samples
//! the resulting transforms, so clients can preview the camera curve
//! without rendering any pixels.

use lenscast_frame_model::event::{TriggerKind, ZoomTrigger};
use lenscast_frame_model::geometry::Point2D;

use crate::camera::{CameraStateMachine, CameraTiming, FrameContext, ZoomPhase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMotionFrame {
    pub time_secs: f64,
    pub phase: ZoomPhase,
    pub scale: f64,
    /// Translation as a percentage of the canvas width.
    pub translate_x_percent: f64,
    /// Translation as a percentage of the canvas height.
    pub translate_y_percent: f64,
}

impl CameraMotionFrame {
    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.3}%, {:.3}%) scale({:.4})",
            self.translate_x_percent, self.translate_y_percent, self.scale
        )
    }
}

/// Sample a full zoom cycle triggered at `anchor` (screen space).
///
/// The first sample is the committing frame at `t = 0`; sampling continues
/// until the camera is wide again. A disabled context yields the single
/// resting frame.
pub fn simulate_zoom_cycle(
    ctx: &FrameContext,
    anchor: Point2D,
    timing: CameraTiming,
    sample_rate_fps: f64,
) -> Vec<CameraMotionFrame> {
    let sample_rate_fps = if sample_rate_fps.is_finite() {
        sample_rate_fps.max(1.0)
    } else {
        60.0
    };
    let step_ns = (1e9 / sample_rate_fps).round().max(1.0) as u64;
    let canvas = ctx.layout.canvas;

    let mut camera = CameraStateMachine::new(timing);
    let mut pending = Some(ZoomTrigger::new(anchor, 0, TriggerKind::Key));
    let mut frames = Vec::new();
    let mut now_ns = 0u64;

    loop {
        let (_, transform) = camera.step(pending.take(), ctx, now_ns);
        let phase = camera.state().phase();
        frames.push(CameraMotionFrame {
            time_secs: now_ns as f64 / 1e9,
            phase,
            scale: transform.scale,
            translate_x_percent: transform.tx / canvas.width * 100.0,
            translate_y_percent: transform.ty / canvas.height * 100.0,
        });

        if phase == ZoomPhase::Wide || camera.cycles_completed() > 0 {
            break;
        }
        now_ns += step_ns;
    }

    frames
}
