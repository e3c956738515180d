//! Focus session lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lenscast_common::clock::RecordingClock;
use lenscast_common::config::AppConfig;
use lenscast_common::error::{LenscastError, LenscastResult};
use lenscast_frame_model::event::TimestampNs;
use lenscast_frame_model::geometry::SourceGeometry;
use lenscast_frame_model::render::{CanvasSize, RenderConfiguration};
use lenscast_input_tracker::{
    InputBackend, InputStatus, InputTracker, TrackerCells, TrackerStats,
};
use lenscast_processing_core::camera::{CameraStateMachine, CameraTiming, FrameContext};
use lenscast_processing_core::trigger::TriggerSettings;
use lenscast_render_engine::{FrameCompositor, VideoFrame};

/// Configuration for a focus session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where the captured source sits on the desktop.
    pub geometry: SourceGeometry,

    /// Pointer sampling rate in Hz.
    pub pointer_sample_rate_hz: u32,

    /// Zoom cycle phase durations.
    pub timing: CameraTiming,
}

impl SessionConfig {
    pub fn new(geometry: SourceGeometry) -> Self {
        Self {
            geometry,
            pointer_sample_rate_hz: 60,
            timing: CameraTiming::default(),
        }
    }

    pub fn from_app(app: &AppConfig, geometry: SourceGeometry) -> Self {
        Self {
            pointer_sample_rate_hz: app.capture.pointer_sample_rate_hz,
            ..Self::new(geometry)
        }
    }
}

/// State of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, input not started. Frames are still composed (wide).
    Idle,
    /// Input tracker running.
    Running,
    /// Input released. Frames are still composed (wide).
    Stopped,
}

/// A live session: input task plus the per-frame camera and compositor.
pub struct FocusSession {
    config: SessionConfig,
    state: SessionState,
    clock: RecordingClock,
    cells: TrackerCells,
    camera: CameraStateMachine,
    compositor: FrameCompositor,
    input_status: InputStatus,
    published_settings: Option<TriggerSettings>,
    input_stop_flag: Option<Arc<AtomicBool>>,
    input_task: Option<tokio::task::JoinHandle<LenscastResult<TrackerStats>>>,
    frames_processed: u64,
}

impl FocusSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, RecordingClock::start())
    }

    /// Create a session on an existing clock (shared with the capture side).
    pub fn with_clock(config: SessionConfig, clock: RecordingClock) -> Self {
        let camera = CameraStateMachine::new(config.timing);
        Self {
            config,
            state: SessionState::Idle,
            clock,
            cells: TrackerCells::default(),
            camera,
            compositor: FrameCompositor::new(),
            input_status: InputStatus::Degraded,
            published_settings: None,
            input_stop_flag: None,
            input_task: None,
            frames_processed: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Input health. `Degraded` until started with a capable backend.
    pub fn input_status(&self) -> InputStatus {
        self.input_status
    }

    pub fn clock(&self) -> &RecordingClock {
        &self.clock
    }

    pub fn cells(&self) -> &TrackerCells {
        &self.cells
    }

    pub fn camera(&self) -> &CameraStateMachine {
        &self.camera
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Start the input tracker on the current tokio runtime.
    ///
    /// A backend without hook edges does not fail the start: the session
    /// runs with zoom triggers disabled and reports [`InputStatus::Degraded`].
    pub fn start(
        &mut self,
        backend: Box<dyn InputBackend>,
        render: &RenderConfiguration,
    ) -> LenscastResult<InputStatus> {
        if self.state != SessionState::Idle {
            return Err(LenscastError::session("Session already started"));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LenscastError::session(format!("No tokio runtime: {e}")))?;

        let caps = backend.capabilities();
        self.input_status = caps.status();
        if self.input_status == InputStatus::Degraded {
            tracing::warn!(
                backend = %backend.name(),
                "Input hook unavailable, focus zoom disabled for this session"
            );
        }

        let settings = self.trigger_settings(render);
        self.cells.settings.publish(settings);
        self.published_settings = Some(settings);

        let tracker = InputTracker::new(
            backend,
            self.clock.clone(),
            self.config.pointer_sample_rate_hz,
            settings,
            self.cells.clone(),
        );
        self.input_stop_flag = Some(tracker.stop_flag());
        self.input_task = Some(runtime.spawn(tracker.run()));

        self.state = SessionState::Running;
        tracing::info!(
            status = ?self.input_status,
            sample_rate_hz = self.config.pointer_sample_rate_hz,
            "Focus session started"
        );
        Ok(self.input_status)
    }

    /// Compose the output for one captured frame, timed by the session clock.
    pub fn process_frame(
        &mut self,
        frame: &VideoFrame,
        render: &RenderConfiguration,
        target: CanvasSize,
    ) -> Option<VideoFrame> {
        let now_ns = self.clock.elapsed_ns();
        self.process_frame_at(frame, render, target, now_ns)
    }

    /// Like [`process_frame`](Self::process_frame) at an explicit session time.
    pub fn process_frame_at(
        &mut self,
        frame: &VideoFrame,
        render: &RenderConfiguration,
        target: CanvasSize,
        now_ns: TimestampNs,
    ) -> Option<VideoFrame> {
        let settings = self.trigger_settings(render);
        if self.published_settings != Some(settings) {
            self.cells.settings.publish(settings);
            self.published_settings = Some(settings);
        }

        let layout = FrameCompositor::layout_for(frame.size(), render);
        let geometry = self.config.geometry.with_pixel_size(frame.size());
        let mut ctx = FrameContext::new(layout, geometry, &render.zoom);
        ctx.zoom_enabled = settings.enabled;

        let trigger = self.cells.trigger.take();
        let (_, transform) = self.camera.step(trigger, &ctx, now_ns);

        let cursor = self
            .cells
            .cursor
            .latest()
            .map(|sample| geometry.to_source_local(sample.position));

        self.frames_processed += 1;
        self.compositor
            .compose(frame, &transform, render, target, cursor)
    }

    /// Stop the input tracker. Safe to call more than once; returns the
    /// tracker counters the first time.
    pub async fn stop(&mut self) -> LenscastResult<Option<TrackerStats>> {
        if self.state != SessionState::Running {
            return Ok(None);
        }

        tracing::info!("Stopping focus session");
        if let Some(stop) = self.input_stop_flag.take() {
            stop.store(true, Ordering::SeqCst);
        }

        let mut stats = None;
        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(Ok(s)) => stats = Some(s),
                Ok(Err(e)) => tracing::warn!(error = %e, "Input tracker exited with error"),
                Err(e) => tracing::warn!(error = %e, "Input tracker join failed"),
            }
        }

        self.state = SessionState::Stopped;
        tracing::info!(
            frames = self.frames_processed,
            cycles = self.camera.cycles_completed(),
            duration_secs = self.clock.elapsed_secs(),
            "Focus session stopped"
        );
        Ok(stats)
    }

    /// Detector settings for this frame's configuration. Triggers are
    /// switched off entirely while input is degraded.
    fn trigger_settings(&self, render: &RenderConfiguration) -> TriggerSettings {
        let mut settings = TriggerSettings::from_zoom(&render.zoom);
        settings.enabled = settings.enabled && self.input_status == InputStatus::Active;
        settings
    }
}

impl Drop for FocusSession {
    fn drop(&mut self) {
        if let Some(stop) = &self.input_stop_flag {
            stop.store(true, Ordering::SeqCst);
        }
    }
}
