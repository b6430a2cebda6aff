//! Terrapin -- immediate-mode turtle graphics on a windowed canvas.
//!
//! A [`World`](world::World) owns an ordered list of turtle cursors and a
//! render sink (the backend seam). Motion commands (`forward`, `jump`,
//! `turn`, pen toggles) rasterize pen strokes onto a persistent layer via
//! Bresenham line drawing and redraw the cursor glyphs on a transient
//! overlay. In the default animated mode every plotted pixel and every
//! degree of rotation is an independently presented frame.
//!
//! The GPU/windowing backend (wgpu + winit) lives behind the `render`
//! feature; the core compiles and tests without it using the headless sink.
//!
//! # Quick Start
//!
//! ```
//! use terrapin::prelude::*;
//!
//! let sink = HeadlessSink::new(640, 480);
//! let mut world = World::new(sink, WorldConfig::default());
//!
//! let t = world.spawn_turtle(320.0, 240.0, 0.0, Rgba::WHITE);
//! world.forward(t, 100.0).unwrap();
//! world.turn(t, 90.0).unwrap();
//!
//! assert_eq!(world.turtle(t).heading, 90.0);
//! ```

#![deny(unsafe_code)]

pub mod geom;
pub mod raster;
pub mod render;
pub mod turtle;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced by the render backend.
///
/// Motion commands present frames as a side effect, so they propagate these.
/// Allocation failure is not represented here: the global allocator aborts
/// the process with a diagnostic, which is the intended fatal, unretried
/// policy for out-of-memory.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend could not present a frame.
    #[error("failed to present frame: {details}")]
    Present { details: String },

    /// The backend ran out of GPU memory. Fatal.
    #[error("render backend out of GPU memory")]
    OutOfMemory,
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::geom::{rotate_points, sign, TurtleRng, Vec2};
    pub use crate::raster::line;
    pub use crate::turtle::{Rgba, Turtle, DEFAULT_GLYPH};
    pub use crate::world::{HeadlessSink, RenderSink, TurtleId, World, WorldConfig};
    pub use crate::RenderError;
}
