//! Lenscast Processing Core: the focus-zoom camera
//!
//! Turns a stream of pointer and keyboard events into camera transforms:
//! - **Trigger detection:** click, dwell and key gestures become `ZoomTrigger`s
//! - **Camera state machine:** one committed zoom-in/hold/zoom-out cycle per trigger
//! - **Layout:** aspect-fill content placement and focus-rectangle math
//!
//! This crate is pure computation with no I/O and no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod camera;
pub mod camera_preview;
pub mod layout;
pub mod trigger;

pub use camera::{CameraStateMachine, CameraTiming, FrameContext, TriggerOutcome, ZoomState};
pub use layout::ContentLayout;
pub use trigger::{TriggerDetector, TriggerSettings};
