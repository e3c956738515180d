//! Lenscast Frame Model
//!
//! Defines the data contracts shared by the live focus-zoom pipeline:
//! - **Events:** Timestamped pointer, button, and key edges plus cursor samples
//! - **Triggers:** The single pending zoom request handed to the camera
//! - **Geometry:** Points, rectangles, and the camera transform
//! - **Render configuration:** Per-frame layout, background, and zoom settings
//!
//! Screen-space coordinates are in the units reported by the input source
//! (typically logical desktop points). Source-local coordinates are pixels
//! of the captured frame.

pub mod event;
pub mod geometry;
pub mod render;

pub use event::*;
pub use geometry::*;
pub use render::*;
