// filepath: src/raster.rs
//! Software rendering of a [`Scene`] into an ARGB8888 buffer.
//!
//! Everything is drawn on the CPU: rectangles as clamped row fills, ovals
//! scanline by scanline from the ellipse equation, text from fontdue
//! coverage masks, images as straight alpha blends. The buffer layout
//! matches what `wl_shm` calls `Argb8888`: bytes B, G, R, A on a
//! little-endian machine.

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;

use crate::color::Color;
use crate::font::FontStore;
use crate::scene::{Anchor, Scene, ShapeKind};

/// One frame's worth of pixels, borrowed for drawing.
pub struct Frame<'a> {
    buf: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(buf: &'a mut [u8], width: u32, height: u32) -> Frame<'a> {
        debug_assert!(buf.len() >= width as usize * height as usize * 4);
        Frame { buf, width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let px = bgra(color);
        for chunk in self.buf.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fills the pixel row `y` from `x0` (inclusive) to `x1` (exclusive),
    /// clamped to the frame.
    fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let xa = x0.clamp(0, self.width as i32) as usize;
        let xb = x1.clamp(0, self.width as i32) as usize;
        if xb <= xa {
            return;
        }
        let row = y as usize * self.width as usize * 4;
        let px = bgra(color);
        for chunk in self.buf[row + xa * 4..row + xb * 4].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        let xa = x0.round() as i32;
        let xb = x1.round() as i32;
        for y in y0.round() as i32..y1.round() as i32 {
            self.fill_span(y, xa, xb, color);
        }
    }

    /// Strokes the rectangle border just inside its bounds.
    pub fn stroke_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f32, color: Color) {
        let w = f64::from(width.max(1.0));
        self.fill_rect(x0, y0, x1, y0 + w, color);
        self.fill_rect(x0, y1 - w, x1, y1, color);
        self.fill_rect(x0, y0 + w, x0 + w, y1 - w, color);
        self.fill_rect(x1 - w, y0 + w, x1, y1 - w, color);
    }

    pub fn fill_oval(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        let rx = (x1 - x0) / 2.0;
        let ry = (y1 - y0) / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let cx = (x0 + x1) / 2.0;
        let cy = (y0 + y1) / 2.0;
        for y in y0.floor() as i32..y1.ceil() as i32 {
            let dy = (f64::from(y) + 0.5 - cy) / ry;
            let t = 1.0 - dy * dy;
            if t <= 0.0 {
                continue;
            }
            let half = rx * t.sqrt();
            self.fill_span(y, (cx - half).round() as i32, (cx + half).round() as i32, color);
        }
    }

    /// Strokes the oval as a ring: the outer ellipse minus one shrunk by
    /// the stroke width.
    pub fn stroke_oval(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f32, color: Color) {
        let rx = (x1 - x0) / 2.0;
        let ry = (y1 - y0) / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let w = f64::from(width.max(1.0));
        let cx = (x0 + x1) / 2.0;
        let cy = (y0 + y1) / 2.0;
        let irx = rx - w;
        let iry = ry - w;
        for y in y0.floor() as i32..y1.ceil() as i32 {
            let fy = f64::from(y) + 0.5 - cy;
            let t_outer = 1.0 - (fy / ry) * (fy / ry);
            if t_outer <= 0.0 {
                continue;
            }
            let half_outer = rx * t_outer.sqrt();
            let xa = (cx - half_outer).round() as i32;
            let xb = (cx + half_outer).round() as i32;

            let t_inner = if irx > 0.0 && iry > 0.0 {
                1.0 - (fy / iry) * (fy / iry)
            } else {
                0.0
            };
            if t_inner <= 0.0 {
                // Row misses the hole, paint it solid.
                self.fill_span(y, xa, xb, color);
            } else {
                let half_inner = irx * t_inner.sqrt();
                self.fill_span(y, xa, (cx - half_inner).round() as i32, color);
                self.fill_span(y, (cx + half_inner).round() as i32, xb, color);
            }
        }
    }

    /// Blends one pixel; `coverage` scales the color's own alpha.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = u32::from(color.a) * u32::from(coverage) / 255;
        if alpha == 0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let blend = |src: u8, dst: u8| {
            ((u32::from(src) * alpha + u32::from(dst) * (255 - alpha)) / 255) as u8
        };
        self.buf[i] = blend(color.b, self.buf[i]);
        self.buf[i + 1] = blend(color.g, self.buf[i + 1]);
        self.buf[i + 2] = blend(color.r, self.buf[i + 2]);
        self.buf[i + 3] = 255;
    }

    /// Blends an RGBA pixel block with its top-left at `(x, y)`.
    pub fn blit_rgba(&mut self, x: f64, y: f64, width: u32, height: u32, rgba: &[u8]) {
        let ox = x.round() as i32;
        let oy = y.round() as i32;
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let src = ((row * width as i32 + col) * 4) as usize;
                let Some(px) = rgba.get(src..src + 4) else { return };
                let color = Color::rgba(px[0], px[1], px[2], px[3]);
                self.blend_pixel(ox + col, oy + row, color, 255);
            }
        }
    }

    /// Draws one line of text with its top-left corner at `(left, top)`.
    pub fn draw_text(
        &mut self,
        font: &Font,
        size: f32,
        left: f64,
        top: f64,
        text: &str,
        color: Color,
    ) {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: left as f32,
            y: top as f32,
            ..LayoutSettings::default()
        });
        layout.append(std::slice::from_ref(font), &TextStyle::new(text, size, 0));
        for glyph in layout.glyphs() {
            if glyph.width == 0 {
                continue;
            }
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            let gx = glyph.x.round() as i32;
            let gy = glyph.y.round() as i32;
            for (i, cov) in coverage.iter().enumerate() {
                if *cov == 0 {
                    continue;
                }
                let dx = (i % metrics.width) as i32;
                let dy = (i / metrics.width) as i32;
                self.blend_pixel(gx + dx, gy + dy, color, *cov);
            }
        }
    }
}

/// Converts to the `Argb8888` byte order.
fn bgra(color: Color) -> [u8; 4] {
    [color.b, color.g, color.r, color.a]
}

/// Paints the whole scene, back to front, over its background color.
pub fn render_scene(frame: &mut Frame<'_>, scene: &Scene, fonts: &FontStore) {
    frame.clear(scene.background());
    for shape in scene.iter() {
        if shape.hidden {
            continue;
        }
        match &shape.kind {
            ShapeKind::Oval => {
                if let Some(fill) = shape.fill {
                    frame.fill_oval(shape.x0, shape.y0, shape.x1, shape.y1, fill);
                }
                if let Some(outline) = shape.outline {
                    frame.stroke_oval(
                        shape.x0,
                        shape.y0,
                        shape.x1,
                        shape.y1,
                        shape.outline_width,
                        outline,
                    );
                }
            }
            ShapeKind::Rectangle => {
                if let Some(fill) = shape.fill {
                    frame.fill_rect(shape.x0, shape.y0, shape.x1, shape.y1, fill);
                }
                if let Some(outline) = shape.outline {
                    frame.stroke_rect(
                        shape.x0,
                        shape.y0,
                        shape.x1,
                        shape.y1,
                        shape.outline_width,
                        outline,
                    );
                }
            }
            ShapeKind::Text {
                text,
                font,
                size,
                anchor,
                measured,
            } => {
                if let Some(fill) = shape.fill {
                    let (left, top) = text_corner(shape.x0, shape.y0, *anchor, *measured);
                    frame.draw_text(fonts.font(*font), *size, left, top, text, fill);
                }
            }
            ShapeKind::Image { data } => {
                frame.blit_rgba(shape.x0, shape.y0, data.width, data.height, &data.rgba);
            }
        }
    }
}

/// Top-left corner of a text block whose position point and anchor are
/// given.
fn text_corner(x: f64, y: f64, anchor: Anchor, (w, h): (f64, f64)) -> (f64, f64) {
    match anchor {
        Anchor::Center => (x - w / 2.0, y - h / 2.0),
        Anchor::North => (x - w / 2.0, y),
        Anchor::South => (x - w / 2.0, y - h),
        Anchor::East => (x - w, y - h / 2.0),
        Anchor::West => (x, y - h / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Style;

    fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn test_clear_writes_argb8888_byte_order() {
        let mut buf = vec![0u8; 2 * 2 * 4];
        Frame::new(&mut buf, 2, 2).clear(Color::rgb(10, 20, 30));
        // Bytes are B, G, R, A.
        assert_eq!(pixel(&buf, 2, 0, 0), [30, 20, 10, 255]);
        assert_eq!(pixel(&buf, 2, 1, 1), [30, 20, 10, 255]);
    }

    #[test]
    fn test_fill_rect_clamps_to_the_frame() {
        let mut buf = vec![0u8; 4 * 4 * 4];
        let mut frame = Frame::new(&mut buf, 4, 4);
        frame.fill_rect(-10.0, -10.0, 2.0, 2.0, Color::WHITE);
        assert_eq!(pixel(&buf, 4, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 4, 1, 1), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_fill_oval_is_widest_at_the_middle() {
        let width = 20u32;
        let mut buf = vec![0u8; (width * 10 * 4) as usize];
        let mut frame = Frame::new(&mut buf, width, 10);
        frame.fill_oval(0.0, 0.0, 20.0, 10.0, Color::RED);

        let row_width = |y: u32| {
            (0..width)
                .filter(|&x| pixel(&buf, width, x, y)[2] == 255)
                .count()
        };
        let middle = row_width(5);
        let top = row_width(0);
        assert_eq!(middle, 20);
        assert!(top < middle);
        assert!(top > 0);
    }

    #[test]
    fn test_stroke_oval_leaves_the_middle_hollow() {
        let mut buf = vec![0u8; 20 * 20 * 4];
        let mut frame = Frame::new(&mut buf, 20, 20);
        frame.stroke_oval(0.0, 0.0, 20.0, 20.0, 2.0, Color::RED);
        // Center untouched, left edge of the center row painted.
        assert_eq!(pixel(&buf, 20, 10, 10), [0, 0, 0, 0]);
        assert_eq!(pixel(&buf, 20, 0, 10), [0, 0, 255, 255]);
    }

    #[test]
    fn test_render_scene_paints_back_to_front() {
        let mut scene = Scene::new();
        scene.set_background(Color::BLUE);
        scene.add_rectangle(2.0, 2.0, 8.0, 8.0, Style::new().fill(Color::RED).no_outline());
        scene.add_rectangle(0.0, 0.0, 4.0, 4.0, Style::new().fill(Color::GREEN).no_outline());

        let mut buf = vec![0u8; 8 * 8 * 4];
        let mut frame = Frame::new(&mut buf, 8, 8);
        render_scene(&mut frame, &scene, &FontStore::new());

        // The later rectangle wins where they overlap; the background shows
        // where neither lands. Bytes are B, G, R, A.
        assert_eq!(pixel(&buf, 8, 3, 3), [0, 255, 0, 255]);
        assert_eq!(pixel(&buf, 8, 6, 6), [0, 0, 255, 255]);
        assert_eq!(pixel(&buf, 8, 0, 7), [255, 0, 0, 255]);
    }

    #[test]
    fn test_hidden_shapes_are_skipped() {
        let mut scene = Scene::new();
        scene.set_background(Color::BLACK);
        let id =
            scene.add_rectangle(0.0, 0.0, 4.0, 4.0, Style::new().fill(Color::RED).no_outline());
        scene.set_hidden(id, true);

        let mut buf = vec![0u8; 4 * 4 * 4];
        let mut frame = Frame::new(&mut buf, 4, 4);
        render_scene(&mut frame, &scene, &FontStore::new());
        assert_eq!(pixel(&buf, 4, 1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blit_blends_transparent_pixels() {
        let mut buf = vec![0u8; 2 * 1 * 4];
        let mut frame = Frame::new(&mut buf, 2, 1);
        frame.clear(Color::WHITE);
        // One opaque red pixel, one fully transparent.
        let rgba = [255, 0, 0, 255, 0, 0, 0, 0];
        frame.blit_rgba(0.0, 0.0, 2, 1, &rgba);
        assert_eq!(pixel(&buf, 2, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&buf, 2, 1, 0), [255, 255, 255, 255]);
    }
}
