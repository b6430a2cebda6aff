//! Geometry helpers for turtle motion and cursor glyphs.
//!
//! Small pure utilities: a 2D vector, a sign function with a documented
//! zero edge case, in-place point rotation, and a seedable uniform RNG for
//! randomized turtle programs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D point/vector in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// sign
// ---------------------------------------------------------------------------

/// Sign of `x`: `1.0` if positive, `-1.0` if negative, otherwise `x` itself.
///
/// The zero case deliberately returns the input value (preserving `-0.0`)
/// rather than `0.0` or `±1.0`. Callers use the result as a step direction,
/// and a zero-length step must stay zero so degenerate lines still plot
/// their single start pixel.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

// ---------------------------------------------------------------------------
// rotate_points
// ---------------------------------------------------------------------------

/// Rotate `points` in place about `pivot` by `radians`.
///
/// Both the new x and the new y of each point are computed from the same
/// pre-rotation coordinates; the in-place x update must not feed into the
/// y computation for the same point.
pub fn rotate_points(points: &mut [Vec2], pivot: Vec2, radians: f64) {
    let (sin, cos) = radians.sin_cos();
    for p in points {
        let dx = p.x - pivot.x;
        let dy = p.y - pivot.y;
        p.x = dx * cos - dy * sin + pivot.x;
        p.y = dx * sin + dy * cos + pivot.y;
    }
}

// ---------------------------------------------------------------------------
// TurtleRng
// ---------------------------------------------------------------------------

/// Uniform random helpers for turtle programs.
///
/// Wraps a PCG generator so randomized drawings can be seeded and replayed
/// deterministically; use [`TurtleRng::from_entropy`] when reproducibility
/// does not matter.
#[derive(Debug, Clone)]
pub struct TurtleRng(Pcg32);

impl TurtleRng {
    /// RNG seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self(Pcg32::from_entropy())
    }

    /// Deterministic RNG from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }

    /// Uniform value in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// `floor(uniform() * n)`: an integer-valued float in `[0, n)`.
    pub fn below(&mut self, n: f64) -> f64 {
        (self.uniform() * n).floor()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn sign_of_nonzero() {
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-0.001), -1.0);
        assert_eq!(sign(f64::INFINITY), 1.0);
    }

    #[test]
    fn sign_of_zero_is_the_zero_itself() {
        let z = sign(0.0);
        assert_eq!(z, 0.0);
        assert!(z.is_sign_positive());

        let nz = sign(-0.0);
        assert_eq!(nz, 0.0);
        assert!(nz.is_sign_negative());
    }

    #[test]
    fn rotate_by_zero_is_identity() {
        let original = [Vec2::new(3.0, -7.5), Vec2::new(0.0, 0.0), Vec2::new(-2.25, 4.0)];
        let mut pts = original;
        rotate_points(&mut pts, Vec2::new(1.0, 2.0), 0.0);
        for (p, o) in pts.iter().zip(original.iter()) {
            assert!((p.x - o.x).abs() < EPS);
            assert!((p.y - o.y).abs() < EPS);
        }
    }

    #[test]
    fn rotate_uses_pre_rotation_coordinates() {
        // Quarter turn of (2, 3) about (1, 1): offset (1, 2) -> (-2, 1),
        // so the point lands on (-1, 2). A buggy in-place update that reads
        // the already-rotated x would produce a different y.
        let mut pts = [Vec2::new(2.0, 3.0)];
        rotate_points(&mut pts, Vec2::new(1.0, 1.0), std::f64::consts::FRAC_PI_2);
        assert!((pts[0].x - -1.0).abs() < EPS);
        assert!((pts[0].y - 2.0).abs() < EPS);
    }

    #[test]
    fn rotations_compose_additively() {
        let pivot = Vec2::new(-1.5, 2.0);
        let (a, b) = (0.73, -2.31);

        let mut twice = [Vec2::new(5.0, -3.0), Vec2::new(0.25, 0.5)];
        rotate_points(&mut twice, pivot, a);
        rotate_points(&mut twice, pivot, b);

        let mut once = [Vec2::new(5.0, -3.0), Vec2::new(0.25, 0.5)];
        rotate_points(&mut once, pivot, a + b);

        for (p, q) in twice.iter().zip(once.iter()) {
            assert!((p.x - q.x).abs() < EPS);
            assert!((p.y - q.y).abs() < EPS);
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = TurtleRng::seeded(42);
        let mut b = TurtleRng::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn uniform_and_below_stay_in_range() {
        let mut rng = TurtleRng::seeded(7);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));

            let r = rng.below(10.0);
            assert!((0.0..10.0).contains(&r));
            assert_eq!(r, r.floor());
        }
    }
}
