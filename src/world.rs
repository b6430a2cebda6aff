//! The turtle world: one rendering session.
//!
//! A [`World`] owns the ordered turtle registry and a [`RenderSink`] (the
//! backend seam) and executes motion commands against them. There is no
//! process-wide state: multiple independent worlds can coexist, which is
//! also what makes the command semantics testable without a GPU via
//! [`HeadlessSink`].
//!
//! # Layers
//!
//! The sink maintains two drawing surfaces. The *persistent layer*
//! accumulates pen strokes and is never cleared during a session; the
//! *transient overlay* holds the cursor glyphs and is fully cleared and
//! redrawn on every refresh. Presenting composites persistent-then-overlay.
//!
//! # Animation
//!
//! In the default animated mode every plotted pixel is drawn, presented,
//! and followed by a full cursor redraw -- each pixel of each line is an
//! independently presented frame, and each degree of a turn redraws the
//! overlay. [`WorldConfig::animate`] set to `false` batches a whole command
//! into a single present instead.

use crate::geom::{self, Vec2};
use crate::raster;
use crate::turtle::{Rgba, Turtle};
use crate::RenderError;

/// Fixed highlight color for cursor glyphs.
const CURSOR_COLOR: Rgba = Rgba::WHITE;

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// The backend surface a [`World`] draws into.
///
/// This is the only seam between the turtle core and the rendering library:
/// two layers, a point primitive, a polyline primitive, and present.
pub trait RenderSink {
    /// Canvas size in pixels, as negotiated with the windowing system.
    fn size(&self) -> (u32, u32);

    /// Additively draw one pixel onto the persistent layer.
    fn draw_point(&mut self, x: i32, y: i32, color: Rgba);

    /// Clear the transient overlay layer.
    fn clear_overlay(&mut self);

    /// Additively stroke a polyline onto the overlay layer.
    fn overlay_polyline(&mut self, points: &[Vec2], color: Rgba);

    /// Composite persistent-then-overlay to the canvas and present.
    fn present(&mut self) -> Result<(), RenderError>;
}

// ---------------------------------------------------------------------------
// HeadlessSink
// ---------------------------------------------------------------------------

/// A recording sink with no GPU behind it.
///
/// Stores plotted pixels and the current overlay contents, and counts
/// clears and presents. Used for GPU-less sessions and for asserting the
/// observable side effects of motion commands in tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSink {
    width: u32,
    height: u32,
    /// Every pixel ever drawn to the persistent layer, in plot order.
    pub points: Vec<(i32, i32, Rgba)>,
    /// Current overlay polylines (reset by each clear).
    pub overlay: Vec<Vec<Vec2>>,
    /// Number of overlay clears, i.e. cursor redraw passes.
    pub overlay_clears: u64,
    /// Number of presented frames.
    pub presents: u64,
}

impl HeadlessSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl RenderSink for HeadlessSink {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Rgba) {
        self.points.push((x, y, color));
    }

    fn clear_overlay(&mut self) {
        self.overlay.clear();
        self.overlay_clears += 1;
    }

    fn overlay_polyline(&mut self, points: &[Vec2], _color: Rgba) {
        self.overlay.push(points.to_vec());
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.presents += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WorldConfig
// ---------------------------------------------------------------------------

/// Session configuration.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Present after every plotted pixel and every degree of rotation
    /// (the classic frame-by-frame animation). When `false`, a whole
    /// command is drawn and presented once.
    pub animate: bool,
    /// Scale factor applied to glyph offsets when drawing cursors.
    pub glyph_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            animate: true,
            glyph_size: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TurtleId
// ---------------------------------------------------------------------------

/// Handle to a turtle registered in a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurtleId(usize);

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// One turtle-graphics session: turtle registry, config, and render sink.
///
/// Turtles are registered in creation order and live until the world is
/// dropped. All motion commands take a [`TurtleId`] returned by
/// [`spawn_turtle`](Self::spawn_turtle).
pub struct World<S: RenderSink> {
    sink: S,
    config: WorldConfig,
    turtles: Vec<Turtle>,
}

impl<S: RenderSink> World<S> {
    /// Create a session over an initialized sink. The sink's canvas is
    /// expected to be cleared to transparent black.
    pub fn new(sink: S, config: WorldConfig) -> Self {
        let (width, height) = sink.size();
        tracing::info!(width, height, animate = config.animate, "turtle world created");
        Self {
            sink,
            config,
            turtles: Vec::new(),
        }
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.sink.size()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Register a new turtle. The pen starts down.
    pub fn spawn_turtle(&mut self, x: f64, y: f64, heading: f64, color: Rgba) -> TurtleId {
        let id = TurtleId(self.turtles.len());
        self.turtles.push(Turtle::new(x, y, heading, color));
        tracing::debug!(id = id.0, x, y, heading, "turtle spawned");
        id
    }

    /// The turtle behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different world.
    pub fn turtle(&self, id: TurtleId) -> &Turtle {
        &self.turtles[id.0]
    }

    /// Number of registered turtles.
    pub fn turtle_count(&self) -> usize {
        self.turtles.len()
    }

    // -----------------------------------------------------------------------
    // Motion commands
    // -----------------------------------------------------------------------

    /// Move `distance` units along the current heading, drawing if the pen
    /// is down. (Turtle-graphics `move`; `move` is reserved in Rust.)
    pub fn forward(&mut self, id: TurtleId, distance: f64) -> Result<(), RenderError> {
        let t = &self.turtles[id.0];
        let h = t.heading.to_radians();
        let nx = t.x + distance * h.cos();
        let ny = t.y + distance * h.sin();
        tracing::trace!(id = id.0, distance, nx, ny, "forward");
        self.draw_to(id, nx, ny)
    }

    /// Move to the absolute coordinate `(x, y)`, drawing if the pen is down.
    pub fn jump(&mut self, id: TurtleId, x: f64, y: f64) -> Result<(), RenderError> {
        tracing::trace!(id = id.0, x, y, "jump");
        self.draw_to(id, x, y)
    }

    /// Rotate the heading by `degrees`, one degree at a time.
    ///
    /// The delta is applied over exactly `ceil(|degrees|)` steps: one signed
    /// whole degree per step while at least a degree remains, then the
    /// residual. In animated mode the cursor overlay is fully redrawn after
    /// every step, so the redraw count equals `ceil(|degrees|)`; in batched
    /// mode it is refreshed once after the final step.
    pub fn turn(&mut self, id: TurtleId, degrees: f64) -> Result<(), RenderError> {
        tracing::trace!(id = id.0, degrees, "turn");
        let steps = degrees.abs().ceil() as u64;
        let mut remaining = degrees;
        for _ in 0..steps {
            let step = if remaining.abs() >= 1.0 {
                geom::sign(remaining)
            } else {
                remaining
            };
            self.turtles[id.0].heading += step;
            remaining -= step;
            if self.config.animate {
                self.refresh_cursors()?;
            }
        }
        if !self.config.animate && steps > 0 {
            self.refresh_cursors()?;
        }
        Ok(())
    }

    /// Raise the pen: subsequent motion repositions without drawing.
    pub fn pen_up(&mut self, id: TurtleId) {
        self.turtles[id.0].pen_down = false;
    }

    /// Lower the pen: subsequent motion draws.
    pub fn pen_down(&mut self, id: TurtleId) {
        self.turtles[id.0].pen_down = true;
    }

    /// Overwrite the stored pen color; takes effect on the next draw.
    pub fn set_pen_color(&mut self, id: TurtleId, color: Rgba) {
        self.turtles[id.0].color = color;
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Shared tail of `forward`/`jump`: rasterize if the pen is down, then
    /// assign the exact floating-point endpoint.
    fn draw_to(&mut self, id: TurtleId, nx: f64, ny: f64) -> Result<(), RenderError> {
        let t = &self.turtles[id.0];
        if t.pen_down {
            let color = t.color;
            let (x1, y1) = (t.x as i32, t.y as i32);
            let (x2, y2) = (nx as i32, ny as i32);

            let mut pixels = Vec::new();
            raster::line(x1, y1, x2, y2, |x, y| pixels.push((x, y)));
            for (x, y) in pixels {
                self.plot(id, x, y, color)?;
            }
            if !self.config.animate {
                self.refresh_cursors()?;
            }
        }

        // The endpoint assignment is authoritative: the command lands on the
        // computed target, not on the accumulated integer plot result.
        let t = &mut self.turtles[id.0];
        t.x = nx;
        t.y = ny;
        Ok(())
    }

    /// The per-pixel side effect: the owning turtle's position tracks the
    /// plotted coordinate, the pixel lands additively on the persistent
    /// layer, and in animated mode the frame is presented and followed by
    /// a full cursor redraw.
    fn plot(&mut self, id: TurtleId, x: i32, y: i32, color: Rgba) -> Result<(), RenderError> {
        let t = &mut self.turtles[id.0];
        t.x = f64::from(x);
        t.y = f64::from(y);

        self.sink.draw_point(x, y, color);
        if self.config.animate {
            self.sink.present()?;
            self.refresh_cursors()?;
        }
        Ok(())
    }

    /// Clear the overlay, stroke every turtle's glyph at its current
    /// position and heading, and present.
    ///
    /// Idempotent for unchanged turtle state: the overlay is fully cleared
    /// before redrawing, so repeated refreshes cannot accumulate.
    pub fn refresh_cursors(&mut self) -> Result<(), RenderError> {
        self.sink.clear_overlay();
        for t in &self.turtles {
            let size = self.config.glyph_size;
            let mut pts: Vec<Vec2> = t
                .glyph()
                .iter()
                .map(|p| Vec2::new(p.x * size + t.x, p.y * size + t.y))
                .collect();
            let Some(&pivot) = pts.first() else {
                continue;
            };
            geom::rotate_points(&mut pts, pivot, t.heading.to_radians());
            self.sink.overlay_polyline(&pts, CURSOR_COLOR);
        }
        self.sink.present()
    }
}
