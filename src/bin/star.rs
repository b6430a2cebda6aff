//! Draw a five-pointed star with a single turtle, then wait for the window
//! to be closed.
//!
//! Run with:
//!   cargo run --bin star --features render
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=terrapin=debug`).

use terrapin::prelude::*;
use terrapin::render::run_windowed;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;
const RADIUS: f64 = 300.0;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run_windowed(
        |world| {
            let (w, h) = world.size();
            let (w, h) = (f64::from(w), f64::from(h));

            let turtle = world.spawn_turtle(w / 2.0, h / 2.0, 0.0, Rgba::WHITE);

            world.pen_up(turtle);
            world.jump(turtle, (w - RADIUS) / 2.0, h / 2.0)?;
            world.pen_down(turtle);

            for _ in 0..5 {
                world.forward(turtle, RADIUS)?;
                world.turn(turtle, 144.0)?;
            }

            Ok(())
        },
        "terrapin star",
        WIDTH,
        HEIGHT,
    )
}
