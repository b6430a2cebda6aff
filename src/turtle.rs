//! The turtle cursor record.

use crate::geom::Vec2;

// ---------------------------------------------------------------------------
// Rgba
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque white; also the fixed cursor highlight color.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as `0.0..=1.0` floats, for GPU vertex colors.
    pub fn to_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

// ---------------------------------------------------------------------------
// Glyph
// ---------------------------------------------------------------------------

/// Default cursor glyph: a small arrow polyline pointing along heading 0,
/// as offsets from the turtle's own origin. Closed (first point repeated)
/// so a single polyline stroke draws the full outline.
pub const DEFAULT_GLYPH: [Vec2; 5] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(2.0, 0.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(0.0, 0.0),
];

// ---------------------------------------------------------------------------
// Turtle
// ---------------------------------------------------------------------------

/// One turtle cursor: position, heading, pen state, pen color, and an owned
/// copy of its glyph offsets.
///
/// Heading is in degrees and wraps conceptually every 360; it is not
/// normalized and may grow without bound. Each turtle owns its glyph points
/// (value semantics) so per-turtle glyph edits can never alias another
/// cursor's shape.
#[derive(Debug, Clone)]
pub struct Turtle {
    /// Position in canvas coordinates.
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, unbounded.
    pub heading: f64,
    /// When false, motion commands reposition without drawing.
    pub pen_down: bool,
    /// Pen color applied to the next rasterized stroke.
    pub color: Rgba,
    glyph: Vec<Vec2>,
}

impl Turtle {
    /// New turtle at `(x, y)` with the given heading and pen color.
    /// The pen starts down and the glyph is a copy of [`DEFAULT_GLYPH`].
    pub fn new(x: f64, y: f64, heading: f64, color: Rgba) -> Self {
        Self {
            x,
            y,
            heading,
            pen_down: true,
            color,
            glyph: DEFAULT_GLYPH.to_vec(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Glyph offsets used for cursor rendering (not part of the drawn path).
    pub fn glyph(&self) -> &[Vec2] {
        &self.glyph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_turtle_starts_with_pen_down_and_own_glyph() {
        let t = Turtle::new(10.0, 20.0, 90.0, Rgba::WHITE);
        assert!(t.pen_down);
        assert_eq!(t.glyph(), &DEFAULT_GLYPH);

        // Cloned turtles get independent glyph storage.
        let u = t.clone();
        assert_eq!(t.glyph(), u.glyph());
    }
}
