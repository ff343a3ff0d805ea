// filepath: src/bin/seaside.rs
//! A seaside sunset: the sun sinks past drifting clouds into a rolling
//! sea, and the sky turns over to a moonlit good-night scene.

use std::error::Error;
use std::thread;
use std::time::Duration;

use easel::{Anchor, Canvas, CanvasError, Color, Style, TextStyle};

const CANVAS_WIDTH: u32 = 600;
const CANVAS_HEIGHT: u32 = 300;
const SUN_SIZE: f64 = 70.0;

/// The sun turns orange once its middle crosses the first line and red
/// once it crosses the second.
const ORANGE_Y: f64 = CANVAS_HEIGHT as f64 / 3.0;
const RED_Y: f64 = CANVAS_HEIGHT as f64 * 2.0 / 3.0;

const FRAME_DELAY: Duration = Duration::from_millis(10);

/// Oval clusters the two clouds are built from.
const CLOUD_ONE: [(f64, f64, f64, f64); 3] = [
    (90.0, 40.0, 140.0, 80.0),
    (120.0, 30.0, 180.0, 90.0),
    (160.0, 40.0, 210.0, 80.0),
];
const CLOUD_TWO: [(f64, f64, f64, f64); 4] = [
    (490.0, 30.0, 545.0, 65.0),
    (460.0, 30.0, 515.0, 65.0),
    (475.0, 55.0, 530.0, 90.0),
    (445.0, 55.0, 500.0, 90.0),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, "Sunset")?;
    canvas.set_background_color(Color::parse("deep sky blue")?);

    let sea = Color::parse("turquoise4")?;
    let sea_y = f64::from(CANVAS_HEIGHT) * 3.0 / 4.0;
    canvas.create_rectangle(
        0.0,
        sea_y,
        f64::from(CANVAS_WIDTH),
        f64::from(CANVAS_HEIGHT),
        Style::new().fill(sea).outline(sea),
    );

    // Wave ovals straddle the waterline and run well past the right edge,
    // so drifting them left never bares the sea.
    for i in (0..1000).step_by(60) {
        let x = f64::from(i);
        canvas.create_oval(
            x,
            sea_y - 15.0,
            x + 60.0,
            sea_y + 15.0,
            Style::new().fill(sea).outline(sea).tag("wave"),
        );
    }

    let cloud = Color::parse("light cyan")?;
    for (x0, y0, x1, y1) in CLOUD_ONE {
        canvas.create_oval(x0, y0, x1, y1, Style::new().fill(cloud).outline(cloud).tag("cloud1"));
    }
    for (x0, y0, x1, y1) in CLOUD_TWO {
        canvas.create_oval(x0, y0, x1, y1, Style::new().fill(cloud).outline(cloud).tag("cloud2"));
    }

    let left = (f64::from(CANVAS_WIDTH) - SUN_SIZE) / 2.0;
    let sun = canvas.create_oval(
        left,
        0.0,
        left + SUN_SIZE,
        SUN_SIZE,
        Style::new().fill(Color::YELLOW).outline(Color::YELLOW),
    );

    while !canvas.is_closed() && !fully_set(canvas.top_y(sun)?) {
        canvas.move_by(sun, 0.0, 0.8);
        canvas.move_by("cloud1", 0.1, 0.0);
        canvas.move_by("cloud2", 0.1, 0.0);
        canvas.move_by("wave", -0.5, 0.0);
        canvas.update()?;
        thread::sleep(FRAME_DELAY);

        let color = sun_color(canvas.top_y(sun)?);
        canvas.set_fill_color(sun, color)?;
        canvas.set_outline_color(sun, color)?;
    }

    if !canvas.is_closed() {
        good_night(&mut canvas)?;
    }

    println!("animation complete");
    canvas.wait_for_close()?;
    Ok(())
}

/// Swaps the sky for night: a gold caption and a crescent moon.
fn good_night(canvas: &mut Canvas) -> Result<(), CanvasError> {
    let night = Color::parse("midnight blue")?;
    canvas.set_background_color(night);

    canvas.create_text(
        200.0,
        130.0,
        "Good Night!",
        TextStyle::new()
            .fill(Color::parse("gold")?)
            .font("Garamond", 36.0)
            .anchor(Anchor::West),
    )?;

    let moon = Color::parse("goldenrod1")?;
    canvas.create_oval(25.0, 25.0, 75.0, 75.0, Style::new().fill(moon).outline(moon));
    // A disk of night sky bites the moon down to a crescent.
    canvas.create_oval(40.0, 15.0, 110.0, 80.0, Style::new().fill(night).outline(night));

    canvas.update()
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
    fn test_color_thresholds_match_the_sky_lines() {
        assert_eq!(sun_color(0.0), Color::YELLOW);

        let orange_line = ORANGE_Y - SUN_SIZE / 2.0;
        assert_eq!(sun_color(orange_line), Color::YELLOW);
        assert_eq!(sun_color(orange_line + 0.8), Color::ORANGE);

        let red_line = RED_Y - SUN_SIZE / 2.0;
        assert_eq!(sun_color(red_line), Color::ORANGE);
        assert_eq!(sun_color(red_line + 0.8), Color::RED);
    }

    #[test]
    fn test_sun_is_fully_set_at_the_bottom_edge() {
        assert!(!fully_set(f64::from(CANVAS_HEIGHT) - 0.8));
        assert!(fully_set(f64::from(CANVAS_HEIGHT)));
        assert!(fully_set(f64::from(CANVAS_HEIGHT) + 0.8));
    }

    #[test]
    fn test_waves_outrun_their_leftward_drift() {
        // The sun falls the full canvas height at 0.8 px/frame while the
        // waves drift left at 0.5 px/frame. The rightmost wave oval
        // (starting at 960) must still cover the right edge at the end.
        let frames = (f64::from(CANVAS_HEIGHT) / 0.8).ceil();
        let rightmost_end = 960.0 + 60.0 - 0.5 * frames;
        assert!(rightmost_end >= f64::from(CANVAS_WIDTH));
    }
}
