// filepath: src/bin/sunset.rs
//! A setting sun: a yellow disk sinks through a blue sky, turning orange
//! and then red before slipping below the bottom edge.

use std::error::Error;
use std::thread;
use std::time::Duration;

use easel::{Canvas, Color, Style};

const CANVAS_WIDTH: u32 = 600;
const CANVAS_HEIGHT: u32 = 300;
const SUN_SIZE: f64 = 70.0;

/// The sun turns orange once its middle crosses the first line and red
/// once it crosses the second.
const ORANGE_Y: f64 = CANVAS_HEIGHT as f64 / 3.0;
const RED_Y: f64 = CANVAS_HEIGHT as f64 * 2.0 / 3.0;

const FRAME_DELAY: Duration = Duration::from_millis(25);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, "Sunset")?;
    canvas.set_background_color(Color::BLUE);

    let left = (f64::from(CANVAS_WIDTH) - SUN_SIZE) / 2.0;
    let sun = canvas.create_oval(
        left,
        0.0,
        left + SUN_SIZE,
        SUN_SIZE,
        Style::new().fill(Color::YELLOW),
    );

    while !canvas.is_closed() && !fully_set(canvas.top_y(sun)?) {
        canvas.move_by(sun, 0.0, 1.0);
        canvas.update()?;
        thread::sleep(FRAME_DELAY);
        canvas.set_fill_color(sun, sun_color(canvas.top_y(sun)?))?;
    }

    println!("animation complete");
    canvas.wait_for_close()?;
    Ok(())
}

/// Color of the sun as a function of its top edge.
fn sun_color(top_y: f64) -> Color {
    if top_y > RED_Y - SUN_SIZE / 2.0 {
        Color::RED
    } else if top_y > ORANGE_Y - SUN_SIZE / 2.0 {
        Color::ORANGE
    } else {
        Color::YELLOW
    }
}

/// The sun has set once its top edge passes the bottom of the canvas.
fn fully_set(top_y: f64) -> bool {
    top_y >= f64::from(CANVAS_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_starts_yellow() {
        assert_eq!(sun_color(0.0), Color::YELLOW);
    }

    #[test]
    fn test_sun_turns_orange_only_past_the_first_line() {
        let boundary = ORANGE_Y - SUN_SIZE / 2.0;
        assert_eq!(sun_color(boundary), Color::YELLOW);
        assert_eq!(sun_color(boundary + 1.0), Color::ORANGE);
    }

    #[test]
    fn test_sun_turns_red_only_past_the_second_line() {
        let boundary = RED_Y - SUN_SIZE / 2.0;
        assert_eq!(sun_color(boundary), Color::ORANGE);
        assert_eq!(sun_color(boundary + 1.0), Color::RED);
    }

    #[test]
    fn test_sun_is_fully_set_at_the_bottom_edge() {
        assert!(!fully_set(299.0));
        assert!(fully_set(300.0));
        assert!(fully_set(301.0));
    }
}
