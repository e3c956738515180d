//! Input backend implementations.
//!
//! Each backend provides a different way to observe the pointer and the
//! input hook. The platform-specific ones live in submodules; the scripted
//! and degraded backends are available everywhere.

use std::collections::VecDeque;

use lenscast_common::error::LenscastResult;
use lenscast_frame_model::event::{InputEvent, TimestampNs};
use lenscast_frame_model::geometry::{Point2D, Rect};

use crate::{InputBackend, InputCapabilities};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod non_linux;

#[cfg(target_os = "linux")]
pub use linux::EvdevBackend;

/// Scripted backend for tests and demos.
///
/// Events are released once the tracker clock reaches their timestamp,
/// so a script replays at the pace it was written.
pub struct StubBackend {
    events: VecDeque<InputEvent>,
    position: Option<Point2D>,
    capabilities: InputCapabilities,
}

impl StubBackend {
    /// Create a stub backend with pre-loaded events (sorted by timestamp).
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp_ns);
        Self {
            events: events.into(),
            position: None,
            capabilities: InputCapabilities::FULL,
        }
    }

    /// Create an empty stub that never produces events.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Start with a known pointer position before any scripted move.
    pub fn with_position(mut self, position: Point2D) -> Self {
        self.position = Some(position);
        self
    }

    /// Override the advertised capabilities.
    pub fn with_capabilities(mut self, capabilities: InputCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Number of scripted events not yet released.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputBackend for StubBackend {
    fn poll(&mut self, now_ns: TimestampNs) -> LenscastResult<Option<InputEvent>> {
        let due = self
            .events
            .front()
            .is_some_and(|event| event.timestamp_ns <= now_ns);
        if !due {
            return Ok(None);
        }
        let event = self.events.pop_front();
        if let Some(position) = event.as_ref().and_then(InputEvent::pointer_position) {
            self.position = Some(position);
        }
        Ok(event)
    }

    fn pointer_position(&self) -> Option<Point2D> {
        self.position
    }

    fn capabilities(&self) -> InputCapabilities {
        self.capabilities
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn shutdown(&mut self) {
        self.events.clear();
    }
}

/// Backend used when no input hook could be installed.
///
/// Observes nothing: no events, no pointer position, no capabilities.
pub struct NullBackend {
    reason: String,
}

impl NullBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the real backend was unavailable.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl InputBackend for NullBackend {
    fn poll(&mut self, _now_ns: TimestampNs) -> LenscastResult<Option<InputEvent>> {
        Ok(None)
    }

    fn pointer_position(&self) -> Option<Point2D> {
        None
    }

    fn capabilities(&self) -> InputCapabilities {
        InputCapabilities {
            move_samples: false,
            button_edges: false,
            key_edges: false,
        }
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Detect the best available input backend for the current system.
///
/// `bounds` is the captured source in screen coordinates; pointer motion
/// is clamped to it. Never fails: without a usable hook the degraded
/// [`NullBackend`] is returned and a diagnostic is logged.
pub fn detect_best_backend(bounds: Rect) -> Box<dyn InputBackend> {
    #[cfg(target_os = "linux")]
    {
        linux::detect_best_backend(bounds)
    }
    #[cfg(not(target_os = "linux"))]
    {
        non_linux::detect_best_backend(bounds)
    }
}
