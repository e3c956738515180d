//! Lenscast Render Engine
//!
//! Real-time compositing of captured frames. Every input frame yields one
//! output frame of exactly the requested canvas size:
//!
//! ```text
//! background (cached) ──┐
//!                       ├── drop shadow (blurred, offset down)
//! raw frame ──┐         │        │
//!             ├── rounded crop ──┴── camera transform
//! camera ─────┘                          │
//!                                        ├── cursor halo (wide transform)
//!                                        ▼
//!                                 resample to canvas
//! ```

pub mod background;
pub mod compositor;
pub mod frame;
pub mod highlight;
pub mod styling;

pub use compositor::FrameCompositor;
pub use frame::VideoFrame;
