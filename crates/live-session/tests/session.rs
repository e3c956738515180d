use std::time::Duration;

use image::{Rgba, RgbaImage};
use lenscast_frame_model::event::{InputEvent, TriggerKind, ZoomTrigger};
use lenscast_frame_model::geometry::{Point2D, SourceGeometry};
use lenscast_frame_model::render::{CanvasSize, RenderConfiguration};
use lenscast_input_tracker::backends::{NullBackend, StubBackend};
use lenscast_live_session::{FocusSession, InputStatus, SessionConfig, SessionState};
use lenscast_processing_core::camera::ZoomPhase;
use lenscast_render_engine::VideoFrame;

fn small_config() -> RenderConfiguration {
    RenderConfiguration {
        canvas: CanvasSize::new(64, 36),
        padding: 4.0,
        ..RenderConfiguration::default()
    }
}

fn frame(pts_ns: u64) -> VideoFrame {
    VideoFrame::new(RgbaImage::from_pixel(192, 108, Rgba([200, 40, 40, 255])), pts_ns)
}

fn session() -> FocusSession {
    lenscast_common::logging::init_test_logging();
    FocusSession::new(SessionConfig::new(SourceGeometry::unscaled(192, 108)))
}

async fn wait_for_trigger(session: &FocusSession) -> bool {
    for _ in 0..200 {
        if session.cells().trigger.is_pending() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn click_starts_zoom_cycle_on_next_frame() {
    let render = small_config();
    let mut session = session();
    let backend = StubBackend::new(vec![
        InputEvent::moved(0, 96.0, 54.0),
        InputEvent::left_down(0),
    ]);

    let status = session.start(Box::new(backend), &render).unwrap();
    assert_eq!(status, InputStatus::Active);
    assert_eq!(session.state(), SessionState::Running);
    assert!(wait_for_trigger(&session).await);

    let out = session
        .process_frame_at(&frame(77), &render, render.canvas, 1_000)
        .expect("frame");
    assert_eq!(out.pts_ns, 77);
    assert_eq!(out.image.dimensions(), (64, 36));
    assert_eq!(session.camera().state().phase(), ZoomPhase::ZoomingIn);
    assert!(!session.cells().trigger.is_pending());

    let stats = session.stop().await.unwrap().expect("first stop reports stats");
    assert_eq!(stats.events, 2);
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.stop().await.unwrap().is_none());
}

#[tokio::test]
async fn degraded_input_keeps_frames_wide() {
    let render = small_config();
    let mut session = session();

    let status = session
        .start(Box::new(NullBackend::new("test")), &render)
        .unwrap();
    assert_eq!(status, InputStatus::Degraded);
    assert_eq!(session.input_status(), InputStatus::Degraded);

    session.cells().trigger.publish(ZoomTrigger::new(
        Point2D::new(10.0, 10.0),
        0,
        TriggerKind::Click,
    ));
    let out = session.process_frame_at(&frame(1), &render, render.canvas, 0);

    assert!(out.is_some());
    assert!(session.camera().state().is_wide());
    assert_eq!(session.camera().triggers_discarded(), 1);
    let published = session.cells().settings.latest().expect("settings");
    assert!(!published.enabled);

    session.stop().await.unwrap();
}

#[tokio::test]
async fn start_twice_is_rejected() {
    let render = small_config();
    let mut session = session();
    session
        .start(Box::new(StubBackend::empty()), &render)
        .unwrap();
    assert!(session
        .start(Box::new(StubBackend::empty()), &render)
        .is_err());
    session.stop().await.unwrap();
}

#[test]
fn start_without_runtime_fails_cleanly() {
    let mut session = session();
    let result = session.start(Box::new(StubBackend::empty()), &small_config());
    assert!(result.is_err());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn idle_session_still_composes_frames() {
    let render = small_config();
    let mut session = session();
    for i in 0..3u64 {
        let out = session
            .process_frame_at(&frame(i), &render, CanvasSize::new(32, 18), i * 16_666_667)
            .expect("frame");
        assert_eq!(out.image.dimensions(), (32, 18));
        assert_eq!(out.pts_ns, i);
    }
    assert_eq!(session.frames_processed(), 3);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn cycle_runs_to_completion_after_zoom_disabled() {
    let mut render = small_config();
    let mut session = session();
    session
        .start(Box::new(StubBackend::empty()), &render)
        .unwrap();

    session.cells().trigger.publish(ZoomTrigger::new(
        Point2D::new(20.0, 20.0),
        0,
        TriggerKind::Key,
    ));
    session.process_frame_at(&frame(0), &render, render.canvas, 0);
    assert_eq!(session.camera().state().phase(), ZoomPhase::ZoomingIn);

    render.zoom.enabled = false;
    session.process_frame_at(&frame(1), &render, render.canvas, 1_000_000_000);
    assert_eq!(session.camera().state().phase(), ZoomPhase::Holding);
    session.process_frame_at(&frame(2), &render, render.canvas, 2_900_000_000);
    assert!(session.camera().state().is_wide());
    assert_eq!(session.camera().cycles_completed(), 1);

    session.stop().await.unwrap();
}
