//! Zoom trigger detection from the live input feed.
//!
//! The detector turns raw pointer/button/key events into at most one
//! [`ZoomTrigger`] per gesture:
//!
//! - **Auto mode:** a left-button press edge (`Click`), or the cursor
//!   resting within `dwell_radius` of where it last moved for the whole
//!   dwell delay (`Dwell`).
//! - **Manual mode:** the press edge of the configured key (`Key`).
//!
//! The detector is a plain single-owner state machine. Time only advances
//! through event timestamps and [`TriggerDetector::poll`], so it behaves
//! identically against a live hook or a scripted event stream.

use lenscast_common::clock::RecordingClock;
use lenscast_frame_model::event::{
    CursorSample, EventKind, InputEvent, TimestampNs, TriggerKind, ZoomTrigger,
};
use lenscast_frame_model::geometry::Point2D;
use lenscast_frame_model::render::{ZoomMode, ZoomSettings};

/// Moves shorter than this (screen units) do not restart the dwell timer.
pub const MOVEMENT_THRESHOLD: f64 = 1.0;

/// Default dwell radius (screen units).
pub const DEFAULT_DWELL_RADIUS: f64 = 20.0;

/// Detector configuration, derived from the render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSettings {
    /// When false, state is still tracked but nothing is emitted.
    pub enabled: bool,
    pub mode: ZoomMode,
    pub dwell_delay_ns: u64,
    pub dwell_radius: f64,
    pub trigger_key_code: u32,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self::from_zoom(&ZoomSettings::default())
    }
}

impl TriggerSettings {
    pub fn from_zoom(zoom: &ZoomSettings) -> Self {
        Self {
            enabled: zoom.enabled,
            mode: zoom.mode,
            dwell_delay_ns: RecordingClock::secs_to_ns(zoom.idle_delay_secs),
            dwell_radius: DEFAULT_DWELL_RADIUS,
            trigger_key_code: zoom.trigger_key_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DwellTimer {
    anchor: Point2D,
    deadline_ns: TimestampNs,
}

/// Gesture detector producing zoom triggers.
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    settings: TriggerSettings,
    position: Option<Point2D>,
    last_significant_position: Option<Point2D>,
    is_clicking: bool,
    is_key_pressed: bool,
    dwell: Option<DwellTimer>,
    emitted: u64,
}

impl TriggerDetector {
    pub fn new(settings: TriggerSettings) -> Self {
        Self {
            settings,
            position: None,
            last_significant_position: None,
            is_clicking: false,
            is_key_pressed: false,
            dwell: None,
            emitted: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TriggerSettings::default())
    }

    pub fn settings(&self) -> &TriggerSettings {
        &self.settings
    }

    /// Swap settings at runtime.
    ///
    /// A mode change drops any half-finished gesture so it cannot complete
    /// under the new mode.
    pub fn apply_settings(&mut self, settings: TriggerSettings) {
        if settings == self.settings {
            return;
        }
        if settings.mode != self.settings.mode {
            tracing::debug!(from = ?self.settings.mode, to = ?settings.mode, "Trigger mode changed");
            self.is_clicking = false;
            self.is_key_pressed = false;
            self.dwell = None;
            self.last_significant_position = None;
        }
        self.settings = settings;
    }

    /// Latest known pointer position.
    pub fn position(&self) -> Option<Point2D> {
        self.position
    }

    /// Number of triggers emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Feed one input event. Returns the trigger it produced, if any.
    ///
    /// A dwell deadline that passed before `event` is resolved first, against
    /// the position as it was at the deadline. If both a dwell and an edge
    /// fire, the later (edge) trigger wins, matching the single pending slot.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<ZoomTrigger> {
        let dwell = self.poll(event.timestamp_ns);
        let t = event.timestamp_ns;

        let edge = match (self.settings.mode, event.kind) {
            (_, EventKind::Move { x, y }) => {
                self.observe_position(Point2D::new(x, y), t);
                None
            }
            (ZoomMode::Auto, EventKind::LeftDown) => {
                if self.is_clicking {
                    None
                } else {
                    self.is_clicking = true;
                    self.emit(TriggerKind::Click, t)
                }
            }
            (ZoomMode::Auto, EventKind::LeftUp) => {
                self.is_clicking = false;
                None
            }
            (ZoomMode::Manual, EventKind::KeyDown { code })
                if code == self.settings.trigger_key_code =>
            {
                if self.is_key_pressed {
                    None
                } else {
                    self.is_key_pressed = true;
                    self.emit(TriggerKind::Key, t)
                }
            }
            (ZoomMode::Manual, EventKind::KeyUp { code })
                if code == self.settings.trigger_key_code =>
            {
                self.is_key_pressed = false;
                None
            }
            _ => None,
        };

        edge.or(dwell)
    }

    /// Feed one periodic cursor sample.
    pub fn handle_sample(&mut self, sample: &CursorSample) -> Option<ZoomTrigger> {
        let dwell = self.poll(sample.timestamp_ns);
        self.observe_position(sample.position, sample.timestamp_ns);
        dwell
    }

    /// Advance time to `now_ns`, resolving an elapsed dwell timer.
    pub fn poll(&mut self, now_ns: TimestampNs) -> Option<ZoomTrigger> {
        if self.settings.mode != ZoomMode::Auto {
            return None;
        }
        let timer = self.dwell?;
        if now_ns < timer.deadline_ns {
            return None;
        }
        self.dwell = None;

        let still = self
            .position
            .map(|p| p.distance_to(&timer.anchor) <= self.settings.dwell_radius)
            .unwrap_or(false);
        if still {
            self.emit(TriggerKind::Dwell, timer.deadline_ns)
        } else {
            None
        }
    }

    fn observe_position(&mut self, p: Point2D, t: TimestampNs) {
        if !p.is_finite() {
            return;
        }
        self.position = Some(p);
        if self.settings.mode != ZoomMode::Auto {
            return;
        }

        let significant = self
            .last_significant_position
            .map(|last| p.distance_to(&last) > MOVEMENT_THRESHOLD)
            .unwrap_or(true);
        if significant {
            self.last_significant_position = Some(p);
            self.dwell = Some(DwellTimer {
                anchor: p,
                deadline_ns: t.saturating_add(self.settings.dwell_delay_ns),
            });
        }
    }

    fn emit(&mut self, kind: TriggerKind, t: TimestampNs) -> Option<ZoomTrigger> {
        if !self.settings.enabled {
            return None;
        }
        let Some(anchor) = self.position else {
            tracing::debug!(?kind, "Gesture without a known pointer position, ignoring");
            return None;
        };
        self.emitted += 1;
        tracing::debug!(?kind, x = anchor.x, y = anchor.y, "Zoom trigger");
        Some(ZoomTrigger::new(anchor, t, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    fn run(detector: &mut TriggerDetector, events: &[InputEvent]) -> Vec<ZoomTrigger> {
        events
            .iter()
            .filter_map(|e| detector.handle_event(e))
            .collect()
    }

    fn manual(key: u32) -> TriggerSettings {
        TriggerSettings {
            mode: ZoomMode::Manual,
            trigger_key_code: key,
            ..TriggerSettings::default()
        }
    }

    #[test]
    fn test_click_fires_once_on_down_edge() {
        let mut detector = TriggerDetector::with_defaults();
        let mut events = vec![InputEvent::moved(0, 400.0, 300.0), InputEvent::left_down(10 * MS)];
        // Button held across many frames; repeated down reports from the hook.
        for frame in 1..30u64 {
            events.push(InputEvent::left_down(10 * MS + frame * 16 * MS));
        }
        events.push(InputEvent::left_up(600 * MS));

        let triggers = run(&mut detector, &events);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].kind, TriggerKind::Click);
        assert_eq!(triggers[0].anchor, Point2D::new(400.0, 300.0));

        let again = detector.handle_event(&InputEvent::left_down(700 * MS));
        assert_eq!(again.map(|t| t.kind), Some(TriggerKind::Click));
    }

    #[test]
    fn test_dwell_fires_after_full_window() {
        let mut detector = TriggerDetector::with_defaults();
        assert!(detector.handle_event(&InputEvent::moved(0, 100.0, 100.0)).is_none());
        // Sub-threshold jitter does not restart the window.
        assert!(detector.handle_event(&InputEvent::moved(300 * MS, 100.5, 100.5)).is_none());
        assert!(detector.poll(699 * MS).is_none());

        let trigger = detector.poll(700 * MS).expect("dwell should fire at the deadline");
        assert_eq!(trigger.kind, TriggerKind::Dwell);
        assert_eq!(trigger.timestamp_ns, 700 * MS);

        // One dwell per rest; no repeat while still.
        assert!(detector.poll(2_000 * MS).is_none());
    }

    #[test]
    fn test_two_unit_move_just_before_deadline_resets_window() {
        let mut detector = TriggerDetector::with_defaults();
        detector.handle_event(&InputEvent::moved(0, 100.0, 100.0));
        assert!(detector.handle_event(&InputEvent::moved(690 * MS, 102.0, 100.0)).is_none());

        assert!(detector.poll(700 * MS).is_none());
        assert!(detector.poll(1_389 * MS).is_none());
        let trigger = detector.poll(1_390 * MS).unwrap();
        assert_eq!(trigger.kind, TriggerKind::Dwell);
        assert_eq!(trigger.anchor, Point2D::new(102.0, 100.0));
    }

    #[test]
    fn test_dwell_deadline_resolved_before_later_event() {
        let mut detector = TriggerDetector::with_defaults();
        detector.handle_event(&InputEvent::moved(0, 50.0, 50.0));
        // First event after the deadline is a large move; dwell still fires
        // because the cursor was at rest when the window elapsed.
        let trigger = detector.handle_event(&InputEvent::moved(900 * MS, 500.0, 500.0));
        assert_eq!(trigger.map(|t| t.kind), Some(TriggerKind::Dwell));
    }

    #[test]
    fn test_samples_drive_dwell_like_moves() {
        let mut detector = TriggerDetector::with_defaults();
        let mut fired = vec![];
        for i in 0..60u64 {
            let sample = CursorSample::new(i * 16 * MS, Point2D::new(10.0, 10.0));
            fired.extend(detector.handle_sample(&sample));
        }
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TriggerKind::Dwell);
    }

    #[test]
    fn test_manual_mode_key_edge_only() {
        let mut detector = TriggerDetector::new(manual(66));
        let events = vec![
            InputEvent::moved(0, 10.0, 20.0),
            InputEvent::left_down(10 * MS),
            InputEvent::key_down(20 * MS, 30),
            InputEvent::key_down(30 * MS, 66),
            InputEvent::key_down(40 * MS, 66),
            InputEvent::key_down(50 * MS, 66),
            InputEvent::key_up(60 * MS, 66),
        ];
        let triggers = run(&mut detector, &events);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].kind, TriggerKind::Key);

        // Auto-mode dwell is suppressed entirely.
        assert!(detector.poll(10_000 * MS).is_none());
        assert!(detector
            .handle_event(&InputEvent::key_down(70 * MS, 66))
            .is_some());
    }

    #[test]
    fn test_disabled_tracks_state_but_emits_nothing() {
        let mut detector = TriggerDetector::new(TriggerSettings {
            enabled: false,
            ..TriggerSettings::default()
        });
        let events = vec![
            InputEvent::moved(0, 10.0, 10.0),
            InputEvent::left_down(5 * MS),
        ];
        assert!(run(&mut detector, &events).is_empty());
        assert!(detector.poll(5_000 * MS).is_none());
        assert_eq!(detector.emitted(), 0);
        assert_eq!(detector.position(), Some(Point2D::new(10.0, 10.0)));
    }

    #[test]
    fn test_mode_switch_drops_pending_dwell() {
        let mut detector = TriggerDetector::with_defaults();
        detector.handle_event(&InputEvent::moved(0, 10.0, 10.0));
        detector.apply_settings(manual(66));
        detector.apply_settings(TriggerSettings::default());
        assert!(detector.poll(5_000 * MS).is_none());
    }

    #[test]
    fn test_click_without_position_is_ignored() {
        let mut detector = TriggerDetector::with_defaults();
        assert!(detector.handle_event(&InputEvent::left_down(0)).is_none());
    }
}
