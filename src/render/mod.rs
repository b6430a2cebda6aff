//! Windowed wgpu backend for the turtle world.
//!
//! Feature-gated behind `render`; when the feature is off this module
//! compiles to nothing and the crate stays GPU-free. The backend implements
//! [`RenderSink`](crate::world::RenderSink) over a wgpu surface and drives
//! the session inside a winit event loop.

#[cfg(feature = "render")]
pub mod window;

#[cfg(feature = "render")]
pub use window::{run_windowed, WindowSink};
