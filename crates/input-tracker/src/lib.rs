//! Lenscast Input Tracker
//!
//! Samples the pointer at a fixed cadence and drains the input hook,
//! feeding both into a [`TriggerDetector`]. Results are handed to the frame
//! context through single-slot cells:
//!
//! - the latest [`CursorSample`] (last write wins)
//! - the pending [`ZoomTrigger`] (consumed once per frame)
//!
//! Backends are pluggable:
//!
//! - **Evdev:** `/dev/input/mice` plus evdev keyboards (Linux, needs the
//!   `input` group)
//! - **Stub:** scripted events for tests and demos
//! - **Null:** no hook; reports degraded capability

pub mod backends;
pub mod cells;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lenscast_common::clock::{RateController, RecordingClock};
use lenscast_common::error::LenscastResult;
use lenscast_frame_model::event::{CursorSample, InputEvent, TimestampNs, ZoomTrigger};
use lenscast_frame_model::geometry::Point2D;
use lenscast_processing_core::trigger::{TriggerDetector, TriggerSettings};

pub use cells::{LatestCell, TriggerCell};

/// Upper bound on hook events handled per tracker iteration, so the
/// sampler keeps its cadence under an event storm.
const MAX_EVENTS_PER_TICK: usize = 256;

/// Trait for input backends.
pub trait InputBackend: Send {
    /// Next pending event stamped at or before `now_ns`. Never blocks.
    fn poll(&mut self, now_ns: TimestampNs) -> LenscastResult<Option<InputEvent>>;

    /// Latest known pointer position in screen coordinates.
    fn pointer_position(&self) -> Option<Point2D>;

    fn capabilities(&self) -> InputCapabilities;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Release the hook. Called once when the tracker stops.
    fn shutdown(&mut self) {}
}

/// What a backend can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputCapabilities {
    pub move_samples: bool,
    pub button_edges: bool,
    pub key_edges: bool,
}

impl InputCapabilities {
    pub const FULL: InputCapabilities = InputCapabilities {
        move_samples: true,
        button_edges: true,
        key_edges: true,
    };

    /// No hook edges at all; triggers cannot be produced reliably.
    pub fn is_degraded(&self) -> bool {
        !self.button_edges && !self.key_edges
    }

    pub fn status(&self) -> InputStatus {
        if self.is_degraded() {
            InputStatus::Degraded
        } else {
            InputStatus::Active
        }
    }
}

/// Input health as reported to the session owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Active,
    /// Hook unavailable; zoom triggers are disabled.
    Degraded,
}

/// The cells shared between the tracker and the frame context.
#[derive(Debug, Clone, Default)]
pub struct TrackerCells {
    pub cursor: Arc<LatestCell<CursorSample>>,
    pub trigger: Arc<TriggerCell>,
    /// Written by the frame context, applied by the tracker.
    pub settings: Arc<LatestCell<TriggerSettings>>,
}

/// Counters reported when the tracker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub events: u64,
    pub samples: u64,
    pub triggers: u64,
}

/// Runs a backend and a trigger detector on one task.
pub struct InputTracker {
    backend: Box<dyn InputBackend>,
    detector: TriggerDetector,
    clock: RecordingClock,
    sampler: RateController,
    cells: TrackerCells,
    stop_flag: Arc<AtomicBool>,
    stats: TrackerStats,
}

impl InputTracker {
    pub fn new(
        backend: Box<dyn InputBackend>,
        clock: RecordingClock,
        pointer_sample_rate_hz: u32,
        settings: TriggerSettings,
        cells: TrackerCells,
    ) -> Self {
        Self {
            backend,
            detector: TriggerDetector::new(settings),
            clock,
            sampler: RateController::new(pointer_sample_rate_hz),
            cells,
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: TrackerStats::default(),
        }
    }

    pub fn capabilities(&self) -> InputCapabilities {
        self.backend.capabilities()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn cells(&self) -> &TrackerCells {
        &self.cells
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// One iteration of the tracker loop at `now_ns`.
    ///
    /// Applies pending settings, drains due hook events, takes a cursor
    /// sample when the sampler is due, and resolves dwell deadlines.
    /// Returns the number of hook events handled.
    pub fn tick(&mut self, now_ns: TimestampNs) -> usize {
        if let Some(settings) = self.cells.settings.latest() {
            self.detector.apply_settings(settings);
        }

        let mut handled = 0;
        while handled < MAX_EVENTS_PER_TICK {
            match self.backend.poll(now_ns) {
                Ok(Some(event)) => {
                    handled += 1;
                    self.stats.events += 1;
                    if let Some(trigger) = self.detector.handle_event(&event) {
                        self.publish(trigger);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, backend = %self.backend.name(), "Input polling error");
                    break;
                }
            }
        }

        if self.sampler.should_tick(now_ns) {
            if let Some(position) = self.backend.pointer_position() {
                let sample = CursorSample::new(now_ns, position);
                self.cells.cursor.publish(sample);
                self.stats.samples += 1;
                if let Some(trigger) = self.detector.handle_sample(&sample) {
                    self.publish(trigger);
                }
            }
        }

        if let Some(trigger) = self.detector.poll(now_ns) {
            self.publish(trigger);
        }

        handled
    }

    /// Run the tracking loop until the stop flag is set.
    pub async fn run(mut self) -> LenscastResult<TrackerStats> {
        let caps = self.backend.capabilities();
        tracing::info!(
            backend = %self.backend.name(),
            button_edges = caps.button_edges,
            key_edges = caps.key_edges,
            "Input tracker started"
        );

        let idle = Duration::from_millis(1);
        while !self.stop_flag.load(Ordering::Relaxed) {
            let now_ns = self.clock.elapsed_ns();
            if self.tick(now_ns) == 0 {
                tokio::time::sleep(idle).await;
            } else {
                tokio::task::yield_now().await;
            }
        }

        self.backend.shutdown();
        tracing::info!(
            events = self.stats.events,
            samples = self.stats.samples,
            triggers = self.stats.triggers,
            "Input tracker stopped"
        );
        Ok(self.stats)
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    fn publish(&mut self, trigger: ZoomTrigger) {
        self.stats.triggers += 1;
        if self.cells.trigger.publish(trigger) {
            tracing::debug!(kind = ?trigger.kind, "Unconsumed trigger replaced");
        }
    }
}
