//! Lenscast Live Session
//!
//! Wires the input tracker, the camera state machine, and the frame
//! compositor into one live focus-zoom session. The capture collaborator
//! calls [`FocusSession::process_frame`] once per captured frame; input is
//! tracked on a background tokio task.

pub mod session;

pub use lenscast_input_tracker::InputStatus;
pub use session::{FocusSession, SessionConfig, SessionState};
