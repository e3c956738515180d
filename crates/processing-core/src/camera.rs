//! Focus-zoom camera state machine.
//!
//! A zoom is a commitment: once a trigger is accepted the camera runs
//! zoom-in → hold → zoom-out → wide to completion, and every trigger that
//! arrives meanwhile is discarded. The zoomed endpoint is computed once at
//! commit time and never recomputed, so the held framing cannot drift
//! while the live layout changes underneath it.
//!
//! ```text
//!   Wide ──trigger──▶ ZoomingIn ──0.3s──▶ Holding ──2.0s──▶ ZoomingOut ──0.6s──▶ Wide
//! ```

use lenscast_common::clock::RecordingClock;
use lenscast_frame_model::event::{TimestampNs, ZoomTrigger};
use lenscast_frame_model::geometry::{CameraTransform, Rect, SourceGeometry};
use lenscast_frame_model::render::ZoomSettings;

use crate::layout::ContentLayout;

/// Phase durations of one zoom cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraTiming {
    pub zoom_in_ns: u64,
    pub hold_ns: u64,
    pub zoom_out_ns: u64,
}

impl Default for CameraTiming {
    fn default() -> Self {
        Self {
            zoom_in_ns: 300_000_000,
            hold_ns: 2_000_000_000,
            zoom_out_ns: 600_000_000,
        }
    }
}

impl CameraTiming {
    /// Length of a whole cycle from commit back to wide.
    pub fn cycle_ns(&self) -> u64 {
        self.zoom_in_ns + self.hold_ns + self.zoom_out_ns
    }

    pub fn cycle_secs(&self) -> f64 {
        RecordingClock::ns_to_secs(self.cycle_ns())
    }
}

/// Zoom lifecycle. Each non-wide phase carries the wide transform that
/// was live when the cycle was committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomState {
    Wide,
    ZoomingIn {
        start_ns: TimestampNs,
        target: CameraTransform,
        wide: CameraTransform,
    },
    Holding {
        transform: CameraTransform,
        hold_start_ns: TimestampNs,
        wide: CameraTransform,
    },
    ZoomingOut {
        start_ns: TimestampNs,
        from: CameraTransform,
        wide: CameraTransform,
    },
}

/// Payload-free view of [`ZoomState`] for logs and previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomPhase {
    Wide,
    ZoomingIn,
    Holding,
    ZoomingOut,
}

impl ZoomState {
    pub fn phase(&self) -> ZoomPhase {
        match self {
            ZoomState::Wide => ZoomPhase::Wide,
            ZoomState::ZoomingIn { .. } => ZoomPhase::ZoomingIn,
            ZoomState::Holding { .. } => ZoomPhase::Holding,
            ZoomState::ZoomingOut { .. } => ZoomPhase::ZoomingOut,
        }
    }

    pub fn is_wide(&self) -> bool {
        matches!(self, ZoomState::Wide)
    }

    /// Wide transform recorded when the active cycle was committed.
    pub fn committed_wide(&self) -> Option<CameraTransform> {
        match self {
            ZoomState::Wide => None,
            ZoomState::ZoomingIn { wide, .. }
            | ZoomState::Holding { wide, .. }
            | ZoomState::ZoomingOut { wide, .. } => Some(*wide),
        }
    }
}

/// Everything the camera needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub layout: ContentLayout,
    pub geometry: SourceGeometry,
    pub zoom_enabled: bool,
    pub max_zoom: f64,
}

impl FrameContext {
    pub fn new(layout: ContentLayout, geometry: SourceGeometry, zoom: &ZoomSettings) -> Self {
        Self {
            layout,
            geometry,
            zoom_enabled: zoom.enabled,
            max_zoom: zoom.strength,
        }
    }

    /// The live wide transform for this frame.
    pub fn wide_transform(&self) -> CameraTransform {
        self.layout.wide_transform()
    }
}

/// Result of offering a trigger to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    NoTrigger,
    Accepted { focus: Rect },
    /// A cycle is in progress.
    DiscardedBusy,
    /// Zoom is disabled in the configuration.
    DiscardedDisabled,
}

/// Owns the zoom lifecycle. Single-owner; lives on the frame context.
#[derive(Debug, Clone)]
pub struct CameraStateMachine {
    state: ZoomState,
    timing: CameraTiming,
    cycles_started: u64,
    cycles_completed: u64,
    triggers_discarded: u64,
}

impl Default for CameraStateMachine {
    fn default() -> Self {
        Self::new(CameraTiming::default())
    }
}

impl CameraStateMachine {
    pub fn new(timing: CameraTiming) -> Self {
        Self {
            state: ZoomState::Wide,
            timing,
            cycles_started: 0,
            cycles_completed: 0,
            triggers_discarded: 0,
        }
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn timing(&self) -> &CameraTiming {
        &self.timing
    }

    pub fn cycles_started(&self) -> u64 {
        self.cycles_started
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn triggers_discarded(&self) -> u64 {
        self.triggers_discarded
    }

    /// Per-frame update: offer the pending trigger, then advance phases.
    ///
    /// The trigger is judged against the state at the start of the frame,
    /// so a trigger that raced the end of a cycle is still discarded.
    pub fn update(
        &mut self,
        trigger: Option<ZoomTrigger>,
        ctx: &FrameContext,
        now_ns: TimestampNs,
    ) -> TriggerOutcome {
        let outcome = match trigger {
            None => TriggerOutcome::NoTrigger,
            Some(trigger) => self.offer(trigger, ctx, now_ns),
        };
        self.advance(now_ns);
        outcome
    }

    /// Camera transform at `now_ns` given this frame's live wide transform.
    pub fn transform(&self, wide: &CameraTransform, now_ns: TimestampNs) -> CameraTransform {
        match self.state {
            ZoomState::Wide => *wide,
            ZoomState::ZoomingIn {
                start_ns, target, ..
            } => {
                let t = progress(now_ns, start_ns, self.timing.zoom_in_ns);
                CameraTransform::lerp(wide, &target, ease_in_out_quad(t))
            }
            ZoomState::Holding { transform, .. } => transform,
            ZoomState::ZoomingOut { start_ns, from, .. } => {
                let t = progress(now_ns, start_ns, self.timing.zoom_out_ns);
                CameraTransform::lerp(&from, wide, ease_in_out_quad(t))
            }
        }
    }

    /// `update` followed by `transform` for the same frame.
    pub fn step(
        &mut self,
        trigger: Option<ZoomTrigger>,
        ctx: &FrameContext,
        now_ns: TimestampNs,
    ) -> (TriggerOutcome, CameraTransform) {
        let outcome = self.update(trigger, ctx, now_ns);
        let transform = self.transform(&ctx.wide_transform(), now_ns);
        (outcome, transform)
    }

    fn offer(
        &mut self,
        trigger: ZoomTrigger,
        ctx: &FrameContext,
        now_ns: TimestampNs,
    ) -> TriggerOutcome {
        if !self.state.is_wide() {
            self.triggers_discarded += 1;
            tracing::debug!(
                kind = ?trigger.kind,
                phase = ?self.state.phase(),
                "Trigger discarded, zoom cycle in progress"
            );
            return TriggerOutcome::DiscardedBusy;
        }
        if !ctx.zoom_enabled {
            self.triggers_discarded += 1;
            tracing::debug!(kind = ?trigger.kind, "Trigger discarded, zoom disabled");
            return TriggerOutcome::DiscardedDisabled;
        }

        let anchor = ctx.geometry.to_source_local(trigger.anchor);
        let focus = ctx.layout.focus_rect(anchor);
        let target = ctx.layout.target_transform(&focus, ctx.max_zoom);
        let wide = ctx.wide_transform();

        self.state = ZoomState::ZoomingIn {
            start_ns: now_ns,
            target,
            wide,
        };
        self.cycles_started += 1;
        tracing::debug!(
            kind = ?trigger.kind,
            focus_x = focus.x,
            focus_y = focus.y,
            scale = target.scale,
            "Zoom cycle committed"
        );
        TriggerOutcome::Accepted { focus }
    }

    /// Move through every phase whose scheduled end is at or before `now_ns`.
    /// Each phase starts exactly where the previous one was scheduled to end.
    fn advance(&mut self, now_ns: TimestampNs) {
        loop {
            let next = match self.state {
                ZoomState::Wide => return,
                ZoomState::ZoomingIn {
                    start_ns,
                    target,
                    wide,
                } => {
                    let end = start_ns + self.timing.zoom_in_ns;
                    if now_ns < end {
                        return;
                    }
                    ZoomState::Holding {
                        transform: target,
                        hold_start_ns: end,
                        wide,
                    }
                }
                ZoomState::Holding {
                    transform,
                    hold_start_ns,
                    wide,
                } => {
                    let end = hold_start_ns + self.timing.hold_ns;
                    if now_ns < end {
                        return;
                    }
                    ZoomState::ZoomingOut {
                        start_ns: end,
                        from: transform,
                        wide,
                    }
                }
                ZoomState::ZoomingOut { start_ns, .. } => {
                    if now_ns < start_ns + self.timing.zoom_out_ns {
                        return;
                    }
                    self.cycles_completed += 1;
                    ZoomState::Wide
                }
            };
            tracing::debug!(from = ?self.state.phase(), to = ?next.phase(), "Zoom phase");
            self.state = next;
        }
    }
}

/// Quadratic ease-in-out, symmetric about `t = 0.5`.
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn progress(now_ns: TimestampNs, start_ns: TimestampNs, duration_ns: u64) -> f64 {
    if duration_ns == 0 {
        return 1.0;
    }
    let elapsed = now_ns.saturating_sub(start_ns) as f64;
    (elapsed / duration_ns as f64).clamp(0.0, 1.0)
}
