//! Behavior tests for the turtle world, driven through the headless sink.
//!
//! The sink records every plotted pixel, the current overlay contents, and
//! clear/present counts, so these tests can assert the observable side
//! effects of motion commands without a GPU.

use terrapin::prelude::*;

const RED: Rgba = Rgba::new(255, 0, 0, 255);

fn setup(animate: bool) -> (World<HeadlessSink>, TurtleId) {
    let sink = HeadlessSink::new(1024, 768);
    let config = WorldConfig {
        animate,
        ..WorldConfig::default()
    };
    let mut world = World::new(sink, config);
    let id = world.spawn_turtle(512.0, 384.0, 0.0, Rgba::WHITE);
    (world, id)
}

// ---------------------------------------------------------------------------
// turn
// ---------------------------------------------------------------------------

#[test]
fn turn_applies_whole_degrees_one_redraw_each() {
    let (mut world, t) = setup(true);
    world.turn(t, 144.0).unwrap();

    assert_eq!(world.turtle(t).heading, 144.0);
    assert_eq!(world.sink().overlay_clears, 144);
    assert_eq!(world.sink().presents, 144);
}

#[test]
fn turn_negative_fractional_ends_exactly_on_target() {
    let (mut world, t) = setup(true);
    world.turn(t, -30.5).unwrap();

    assert_eq!(world.turtle(t).heading, -30.5);
    assert_eq!(world.sink().overlay_clears, 31);
}

#[test]
fn turn_smaller_than_a_degree_is_a_single_step() {
    let (mut world, t) = setup(true);
    world.turn(t, 0.25).unwrap();

    assert_eq!(world.turtle(t).heading, 0.25);
    assert_eq!(world.sink().overlay_clears, 1);
}

#[test]
fn turn_by_zero_redraws_nothing() {
    let (mut world, t) = setup(true);
    world.turn(t, 0.0).unwrap();

    assert_eq!(world.turtle(t).heading, 0.0);
    assert_eq!(world.sink().overlay_clears, 0);
    assert_eq!(world.sink().presents, 0);
}

// ---------------------------------------------------------------------------
// pen state
// ---------------------------------------------------------------------------

#[test]
fn pen_up_jump_repositions_without_rasterizing() {
    let (mut world, t) = setup(true);

    world.pen_up(t);
    world.jump(t, 100.0, 200.0).unwrap();
    assert!(world.sink().points.is_empty());
    assert_eq!(world.turtle(t).x, 100.0);
    assert_eq!(world.turtle(t).y, 200.0);

    world.pen_down(t);
    world.forward(t, 10.0).unwrap();
    assert!(!world.sink().points.is_empty());
}

#[test]
fn set_pen_color_takes_effect_on_next_draw() {
    let (mut world, t) = setup(true);
    world.set_pen_color(t, RED);
    world.forward(t, 5.0).unwrap();

    assert!(!world.sink().points.is_empty());
    assert!(world.sink().points.iter().all(|&(_, _, c)| c == RED));
}

// ---------------------------------------------------------------------------
// forward / jump drawing
// ---------------------------------------------------------------------------

#[test]
fn forward_endpoint_assignment_is_exact() {
    let (mut world, t) = setup(true);
    world.turn(t, 30.0).unwrap();
    world.forward(t, 2.5).unwrap();

    // Intermediate plots snap the position to integer pixels, but the final
    // assignment is the computed floating-point endpoint, bit for bit.
    let h = 30.0f64.to_radians();
    assert_eq!(world.turtle(t).x, 512.0 + 2.5 * h.cos());
    assert_eq!(world.turtle(t).y, 384.0 + 2.5 * h.sin());
}

#[test]
fn animated_mode_presents_every_pixel() {
    let (mut world, t) = setup(true);
    world.forward(t, 3.0).unwrap();

    // 4 pixels; each plot presents the composite and then the cursor
    // refresh presents again.
    assert_eq!(world.sink().points.len(), 4);
    assert_eq!(world.sink().overlay_clears, 4);
    assert_eq!(world.sink().presents, 8);
}

#[test]
fn batched_mode_presents_once_per_command() {
    let (mut world, t) = setup(false);
    world.forward(t, 50.0).unwrap();

    assert_eq!(world.sink().points.len(), 51);
    assert_eq!(world.sink().overlay_clears, 1);
    assert_eq!(world.sink().presents, 1);
}

// ---------------------------------------------------------------------------
// star scenario
// ---------------------------------------------------------------------------

#[test]
fn five_point_star_returns_home() {
    let (mut world, t) = setup(true);

    world.pen_up(t);
    world.jump(t, (1024.0 - 300.0) / 2.0, 384.0).unwrap();
    world.pen_down(t);

    let start = world.turtle(t).position();
    for _ in 0..5 {
        world.forward(t, 300.0).unwrap();
        world.turn(t, 144.0).unwrap();
    }

    assert_eq!(world.turtle(t).heading, 720.0);
    let end = world.turtle(t).position();
    assert!((end.x - start.x).abs() < 1e-6);
    assert!((end.y - start.y).abs() < 1e-6);

    // Five legs, each rasterizing max(|dx|, |dy|) + 1 pixels between the
    // integer-cast endpoints of a 300-unit segment.
    let mut expected = 0usize;
    let (mut x, mut y) = (start.x, start.y);
    let mut heading = 0.0f64;
    for _ in 0..5 {
        let h = heading.to_radians();
        let (nx, ny) = (x + 300.0 * h.cos(), y + 300.0 * h.sin());
        let dx = (nx as i32 - x as i32).abs();
        let dy = (ny as i32 - y as i32).abs();
        expected += dx.max(dy) as usize + 1;
        // Chebyshev extent of a 300-unit segment is at least 300 / sqrt(2).
        assert!(dx.max(dy) >= 210, "each leg spans a 300-unit segment");
        (x, y) = (nx, ny);
        heading += 144.0;
    }
    assert_eq!(world.sink().points.len(), expected);
}

// ---------------------------------------------------------------------------
// cursor overlay
// ---------------------------------------------------------------------------

#[test]
fn cursor_refresh_is_idempotent() {
    let (mut world, t) = setup(true);
    world.spawn_turtle(10.0, 10.0, 45.0, RED);
    world.turn(t, 5.0).unwrap();

    world.refresh_cursors().unwrap();
    let first = world.sink().overlay.clone();

    world.refresh_cursors().unwrap();
    let second = world.sink().overlay.clone();

    assert_eq!(first.len(), world.turtle_count());
    assert_eq!(first, second);
}

#[test]
fn overlay_holds_one_polyline_per_turtle() {
    let (mut world, _) = setup(true);
    world.spawn_turtle(1.0, 2.0, 0.0, RED);
    world.spawn_turtle(3.0, 4.0, 90.0, RED);

    world.refresh_cursors().unwrap();

    assert_eq!(world.sink().overlay.len(), 3);
    // The default glyph is a closed 5-point polyline.
    for stroke in &world.sink().overlay {
        assert_eq!(stroke.len(), 5);
        let first = stroke[0];
        let last = stroke[4];
        assert!((first.x - last.x).abs() < 1e-9);
        assert!((first.y - last.y).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// sessions
// ---------------------------------------------------------------------------

#[test]
fn worlds_are_independent_sessions() {
    let (mut a, ta) = setup(true);
    let (mut b, tb) = setup(true);

    a.forward(ta, 20.0).unwrap();

    assert!(!a.sink().points.is_empty());
    assert!(b.sink().points.is_empty());
    assert_eq!(b.turtle(tb).x, 512.0);

    b.forward(tb, 1.0).unwrap();
    assert_eq!(b.sink().points.len(), 2);
}
