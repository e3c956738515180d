use lenscast_frame_model::event::{InputEvent, TriggerKind, ZoomTrigger};
use lenscast_frame_model::geometry::{Point2D, Size2D, SourceGeometry};
use lenscast_frame_model::render::ZoomSettings;
use lenscast_processing_core::camera::{
    CameraStateMachine, CameraTiming, FrameContext, TriggerOutcome, ZoomPhase,
};
use lenscast_processing_core::layout::ContentLayout;
use lenscast_processing_core::trigger::TriggerDetector;
use proptest::prelude::*;

const FRAME_NS: u64 = 16_666_667;

fn hd_context() -> FrameContext {
    let layout = ContentLayout::compute(
        Size2D::new(1920.0, 1080.0),
        Size2D::new(1920.0, 1080.0),
        50.0,
    );
    FrameContext::new(
        layout,
        SourceGeometry::unscaled(1920, 1080),
        &ZoomSettings::default(),
    )
}

fn trigger_kind(index: u8) -> TriggerKind {
    match index % 3 {
        0 => TriggerKind::Click,
        1 => TriggerKind::Dwell,
        _ => TriggerKind::Key,
    }
}

proptest! {
    #[test]
    fn prop_busy_camera_discards_every_trigger(
        anchor in (0.0f64..1920.0, 0.0f64..1080.0),
        flood in prop::collection::vec((0.0f64..1920.0, 0.0f64..1080.0, 0u8..3, any::<bool>()), 1..200),
    ) {
        let ctx = hd_context();
        let mut camera = CameraStateMachine::default();
        let first = ZoomTrigger::new(Point2D::new(anchor.0, anchor.1), 0, TriggerKind::Click);
        let accepted = camera.update(Some(first), &ctx, 0);
        let is_accepted = matches!(accepted, TriggerOutcome::Accepted { .. });
        prop_assert!(is_accepted);

        let cycle_ns = camera.timing().cycle_ns();
        let mut now = 0u64;
        for (x, y, kind, present) in flood {
            now += FRAME_NS;
            if now >= cycle_ns {
                break;
            }
            let before_phase = camera.state().phase();
            let trigger = present.then(|| ZoomTrigger::new(Point2D::new(x, y), now, trigger_kind(kind)));
            let outcome = camera.update(trigger, &ctx, now);
            if present {
                prop_assert_eq!(outcome, TriggerOutcome::DiscardedBusy);
            }
            prop_assert_ne!(before_phase, ZoomPhase::Wide);
            prop_assert_eq!(camera.cycles_started(), 1);
        }
    }

    #[test]
    fn prop_cycle_duration_is_fixed(
        start_ns in 0u64..10_000_000_000,
        frame_ns in 4_000_000u64..50_000_000,
        retrigger_every in 1usize..10,
    ) {
        let ctx = hd_context();
        let mut camera = CameraStateMachine::default();
        let expected = camera.timing().cycle_ns();

        let first = ZoomTrigger::new(Point2D::new(960.0, 540.0), start_ns, TriggerKind::Key);
        camera.update(Some(first), &ctx, start_ns);

        let mut now = start_ns;
        let mut frame = 0usize;
        while !camera.state().is_wide() {
            frame += 1;
            now += frame_ns;
            let retrigger = (frame % retrigger_every == 0)
                .then(|| ZoomTrigger::new(Point2D::new(10.0, 10.0), now, TriggerKind::Click));
            camera.update(retrigger, &ctx, now);
        }

        let elapsed = now - start_ns;
        prop_assert!(elapsed >= expected);
        prop_assert!(elapsed < expected + frame_ns);
        prop_assert_eq!(camera.cycles_completed(), 1);
    }

    #[test]
    fn prop_transform_is_continuous_across_boundaries(
        anchor in (0.0f64..1920.0, 0.0f64..1080.0),
    ) {
        let ctx = hd_context();
        let wide = ctx.wide_transform();
        let mut camera = CameraStateMachine::default();
        let timing = *camera.timing();
        let trigger = ZoomTrigger::new(Point2D::new(anchor.0, anchor.1), 0, TriggerKind::Dwell);
        camera.update(Some(trigger), &ctx, 0);

        let hold_at = timing.zoom_in_ns;
        let just_before_hold = camera.transform(&wide, hold_at - 1);
        camera.update(None, &ctx, hold_at);
        prop_assert_eq!(camera.state().phase(), ZoomPhase::Holding);
        let at_hold = camera.transform(&wide, hold_at);
        prop_assert!(just_before_hold.approx_eq(&at_hold, 1e-6));

        let wide_at = timing.cycle_ns();
        camera.update(None, &ctx, wide_at - 1);
        prop_assert_eq!(camera.state().phase(), ZoomPhase::ZoomingOut);
        let just_before_wide = camera.transform(&wide, wide_at - 1);
        camera.update(None, &ctx, wide_at);
        prop_assert!(camera.state().is_wide());
        prop_assert!(just_before_wide.approx_eq(&camera.transform(&wide, wide_at), 1e-6));
    }
}

#[test]
fn held_click_across_frames_commits_one_cycle() {
    let ctx = hd_context();
    let mut detector = TriggerDetector::with_defaults();
    let mut camera = CameraStateMachine::new(CameraTiming::default());

    detector.handle_event(&InputEvent::moved(0, 800.0, 450.0));
    let mut pending = None;
    let mut clicks = 0;
    for frame in 0..30u64 {
        let now = frame * FRAME_NS;
        if let Some(trigger) = detector.handle_event(&InputEvent::left_down(now)) {
            clicks += 1;
            pending = Some(trigger);
        }
        camera.update(pending.take(), &ctx, now);
    }

    assert_eq!(clicks, 1);
    assert_eq!(camera.cycles_started(), 1);
    assert_eq!(camera.triggers_discarded(), 0);
}

#[test]
fn origin_trigger_focus_is_clamped_to_origin() {
    let ctx = hd_context();
    let mut camera = CameraStateMachine::default();
    let trigger = ZoomTrigger::new(Point2D::ORIGIN, 0, TriggerKind::Click);
    match camera.update(Some(trigger), &ctx, 0) {
        TriggerOutcome::Accepted { focus } => {
            assert_eq!(focus.x, 0.0);
            assert_eq!(focus.y, 0.0);
            assert!((focus.width - 768.0).abs() < 1e-9);
            assert!((focus.height - 432.0).abs() < 1e-9);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}
