// filepath: src/scene.rs
//! The retained display list behind a canvas.
//!
//! Shapes live in a single vector ordered back-to-front; that order is the
//! paint order, so the stacking operations are just reorderings. Tags are
//! plain strings, and any operation that accepts a [`Target`] applies to
//! every shape wearing the tag.

use crate::color::Color;
use crate::error::CanvasError;
use crate::font::FontId;

/// Handle to one shape on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeId(u32);

/// Addresses shapes: one handle, or every shape wearing a tag.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    Shape(ShapeId),
    Tag(&'a str),
}

impl<'a> From<ShapeId> for Target<'a> {
    fn from(id: ShapeId) -> Target<'a> {
        Target::Shape(id)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(tag: &'a str) -> Target<'a> {
        Target::Tag(tag)
    }
}

/// Which side of a text shape its position point pins down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Center,
    North,
    South,
    East,
    West,
}

/// Paint options for ovals and rectangles.
#[derive(Clone, Debug)]
pub struct Style {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub outline_width: f32,
    pub tags: Vec<String>,
}

impl Default for Style {
    fn default() -> Style {
        // Tk's defaults: hollow, with a thin black outline.
        Style {
            fill: None,
            outline: Some(Color::BLACK),
            outline_width: 1.0,
            tags: Vec::new(),
        }
    }
}

impl Style {
    pub fn new() -> Style {
        Style::default()
    }

    pub fn fill(mut self, color: Color) -> Style {
        self.fill = Some(color);
        self
    }

    pub fn outline(mut self, color: Color) -> Style {
        self.outline = Some(color);
        self
    }

    pub fn no_outline(mut self) -> Style {
        self.outline = None;
        self
    }

    pub fn outline_width(mut self, width: f32) -> Style {
        self.outline_width = width;
        self
    }

    pub fn tag(mut self, tag: &str) -> Style {
        self.tags.push(tag.to_string());
        self
    }
}

/// Paint options for text shapes.
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub fill: Color,
    /// Font family to look for; `None` takes whatever the system offers.
    pub family: Option<String>,
    pub size: f32,
    pub anchor: Anchor,
    pub tags: Vec<String>,
}

impl Default for TextStyle {
    fn default() -> TextStyle {
        TextStyle {
            fill: Color::BLACK,
            family: None,
            size: 14.0,
            anchor: Anchor::Center,
            tags: Vec::new(),
        }
    }
}

impl TextStyle {
    pub fn new() -> TextStyle {
        TextStyle::default()
    }

    pub fn fill(mut self, color: Color) -> TextStyle {
        self.fill = color;
        self
    }

    pub fn font(mut self, family: &str, size: f32) -> TextStyle {
        self.family = Some(family.to_string());
        self.size = size;
        self
    }

    pub fn size(mut self, size: f32) -> TextStyle {
        self.size = size;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> TextStyle {
        self.anchor = anchor;
        self
    }

    pub fn tag(mut self, tag: &str) -> TextStyle {
        self.tags.push(tag.to_string());
        self
    }
}

/// Decoded RGBA pixels owned by an image shape.
#[derive(Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ShapeKind {
    Oval,
    Rectangle,
    Text {
        text: String,
        font: FontId,
        size: f32,
        anchor: Anchor,
        /// Rendered extent of the current text, in pixels.
        measured: (f64, f64),
    },
    Image {
        data: ImageData,
    },
}

impl ShapeKind {
    fn name(&self) -> &'static str {
        match self {
            ShapeKind::Oval => "oval",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Text { .. } => "text",
            ShapeKind::Image { .. } => "image",
        }
    }
}

/// One entry of the display list.
///
/// Ovals and rectangles use all four coordinates as their bounding box.
/// Text keeps its position point in `(x0, y0)`; images keep their top-left
/// there. Moves shift all four so each kind keeps its meaning.
#[derive(Clone, Debug)]
pub(crate) struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) kind: ShapeKind,
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
    pub(crate) fill: Option<Color>,
    pub(crate) outline: Option<Color>,
    pub(crate) outline_width: f32,
    pub(crate) tags: Vec<String>,
    pub(crate) hidden: bool,
}

impl Shape {
    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A canvas scene: background color plus shapes in paint order.
pub struct Scene {
    shapes: Vec<Shape>,
    next_id: u32,
    background: Color,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene::new()
    }
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            shapes: Vec::new(),
            next_id: 1,
            // Tk's default widget background.
            background: Color::rgb(0xd9, 0xd9, 0xd9),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape ids back-to-front, i.e. the order they are painted.
    pub fn paint_order(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|s| s.id).collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn add_oval(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, style: Style) -> ShapeId {
        self.insert(ShapeKind::Oval, x0, y0, x1, y1, style)
    }

    pub fn add_rectangle(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, style: Style) -> ShapeId {
        self.insert(ShapeKind::Rectangle, x0, y0, x1, y1, style)
    }

    pub(crate) fn add_text(
        &mut self,
        x: f64,
        y: f64,
        text: String,
        style: &TextStyle,
        font: FontId,
        measured: (f64, f64),
    ) -> ShapeId {
        let id = self.alloc_id();
        self.shapes.push(Shape {
            id,
            kind: ShapeKind::Text {
                text,
                font,
                size: style.size,
                anchor: style.anchor,
                measured,
            },
            x0: x,
            y0: y,
            x1: x,
            y1: y,
            fill: Some(style.fill),
            outline: None,
            outline_width: 0.0,
            tags: style.tags.clone(),
            hidden: false,
        });
        id
    }

    pub fn add_image(&mut self, x: f64, y: f64, data: ImageData) -> ShapeId {
        let id = self.alloc_id();
        let (w, h) = (f64::from(data.width), f64::from(data.height));
        self.shapes.push(Shape {
            id,
            kind: ShapeKind::Image { data },
            x0: x,
            y0: y,
            x1: x + w,
            y1: y + h,
            fill: None,
            outline: None,
            outline_width: 0.0,
            tags: Vec::new(),
            hidden: false,
        });
        id
    }

    fn insert(
        &mut self,
        kind: ShapeKind,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        style: Style,
    ) -> ShapeId {
        let id = self.alloc_id();
        // Corners may come in any order.
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        self.shapes.push(Shape {
            id,
            kind,
            x0,
            y0,
            x1,
            y1,
            fill: style.fill,
            outline: style.outline,
            outline_width: style.outline_width,
            tags: style.tags,
            hidden: false,
        });
        id
    }

    fn alloc_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn matches(shape: &Shape, target: Target<'_>) -> bool {
        match target {
            Target::Shape(id) => shape.id == id,
            Target::Tag(tag) => shape.has_tag(tag),
        }
    }

    fn shape(&self, id: ShapeId) -> Result<&Shape, CanvasError> {
        self.shapes
            .iter()
            .find(|s| s.id == id)
            .ok_or(CanvasError::UnknownShape(id))
    }

    fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape, CanvasError> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CanvasError::UnknownShape(id))
    }

    /// Shifts every matching shape. Matching nothing is fine and does
    /// nothing.
    pub fn move_by<'a>(&mut self, target: impl Into<Target<'a>>, dx: f64, dy: f64) {
        let target = target.into();
        for shape in self.shapes.iter_mut().filter(|s| Self::matches(s, target)) {
            shape.x0 += dx;
            shape.x1 += dx;
            shape.y0 += dy;
            shape.y1 += dy;
        }
    }

    /// Moves one shape so its top-left corner lands on `(x, y)`.
    pub fn move_to(&mut self, id: ShapeId, x: f64, y: f64) -> Result<(), CanvasError> {
        let dx = x - self.left_x(id)?;
        let dy = y - self.top_y(id)?;
        self.move_by(id, dx, dy);
        Ok(())
    }

    /// Leftmost x of the shape. For text this is measured from the position
    /// point as if it were the center, whatever the anchor says.
    pub fn left_x(&self, id: ShapeId) -> Result<f64, CanvasError> {
        let shape = self.shape(id)?;
        Ok(match &shape.kind {
            ShapeKind::Text { measured, .. } => shape.x0 - measured.0 / 2.0,
            _ => shape.x0,
        })
    }

    /// Topmost y of the shape, with the same center convention for text.
    pub fn top_y(&self, id: ShapeId) -> Result<f64, CanvasError> {
        let shape = self.shape(id)?;
        Ok(match &shape.kind {
            ShapeKind::Text { measured, .. } => shape.y0 - measured.1 / 2.0,
            _ => shape.y0,
        })
    }

    pub fn width_of(&self, id: ShapeId) -> Result<f64, CanvasError> {
        let shape = self.shape(id)?;
        Ok(match &shape.kind {
            ShapeKind::Text { measured, .. } => measured.0,
            _ => shape.x1 - shape.x0,
        })
    }

    pub fn height_of(&self, id: ShapeId) -> Result<f64, CanvasError> {
        let shape = self.shape(id)?;
        Ok(match &shape.kind {
            ShapeKind::Text { measured, .. } => measured.1,
            _ => shape.y1 - shape.y0,
        })
    }

    /// Recolors matching fills; `None` clears them. Images cannot be filled.
    pub fn set_fill<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        fill: Option<Color>,
    ) -> Result<(), CanvasError> {
        let target = target.into();
        self.check_supported(target, "setting the fill color", |kind| {
            !matches!(kind, ShapeKind::Image { .. })
        })?;
        for shape in self.shapes.iter_mut().filter(|s| Self::matches(s, target)) {
            shape.fill = fill;
        }
        Ok(())
    }

    /// Recolors matching outlines; `None` clears them. Only ovals and
    /// rectangles have outlines.
    pub fn set_outline<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        outline: Option<Color>,
    ) -> Result<(), CanvasError> {
        let target = target.into();
        self.check_supported(target, "setting the outline color", |kind| {
            matches!(kind, ShapeKind::Oval | ShapeKind::Rectangle)
        })?;
        for shape in self.shapes.iter_mut().filter(|s| Self::matches(s, target)) {
            shape.outline = outline;
        }
        Ok(())
    }

    pub fn set_outline_width<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        width: f32,
    ) -> Result<(), CanvasError> {
        let target = target.into();
        self.check_supported(target, "setting the outline width", |kind| {
            matches!(kind, ShapeKind::Oval | ShapeKind::Rectangle)
        })?;
        for shape in self.shapes.iter_mut().filter(|s| Self::matches(s, target)) {
            shape.outline_width = width;
        }
        Ok(())
    }

    fn check_supported(
        &self,
        target: Target<'_>,
        op: &'static str,
        ok: impl Fn(&ShapeKind) -> bool,
    ) -> Result<(), CanvasError> {
        match self
            .shapes
            .iter()
            .find(|s| Self::matches(s, target) && !ok(&s.kind))
        {
            Some(shape) => Err(CanvasError::Unsupported {
                op,
                kind: shape.kind.name(),
            }),
            None => Ok(()),
        }
    }

    pub fn set_hidden<'a>(&mut self, target: impl Into<Target<'a>>, hidden: bool) {
        let target = target.into();
        for shape in self.shapes.iter_mut().filter(|s| Self::matches(s, target)) {
            shape.hidden = hidden;
        }
    }

    pub fn is_hidden(&self, id: ShapeId) -> Result<bool, CanvasError> {
        Ok(self.shape(id)?.hidden)
    }

    pub(crate) fn set_text(
        &mut self,
        id: ShapeId,
        new_text: String,
        new_measured: (f64, f64),
    ) -> Result<(), CanvasError> {
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Text { text, measured, .. } => {
                *text = new_text;
                *measured = new_measured;
                Ok(())
            }
            other => Err(CanvasError::Unsupported {
                op: "setting the text",
                kind: other.name(),
            }),
        }
    }

    pub fn text(&self, id: ShapeId) -> Result<&str, CanvasError> {
        match &self.shape(id)?.kind {
            ShapeKind::Text { text, .. } => Ok(text),
            other => Err(CanvasError::Unsupported {
                op: "reading the text",
                kind: other.name(),
            }),
        }
    }

    pub(crate) fn text_details(&self, id: ShapeId) -> Result<(FontId, f32, &str), CanvasError> {
        match &self.shape(id)?.kind {
            ShapeKind::Text { font, size, text, .. } => Ok((*font, *size, text)),
            other => Err(CanvasError::Unsupported {
                op: "changing the font",
                kind: other.name(),
            }),
        }
    }

    pub(crate) fn set_font(
        &mut self,
        id: ShapeId,
        new_font: FontId,
        new_size: f32,
        new_measured: (f64, f64),
    ) -> Result<(), CanvasError> {
        let shape = self.shape_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Text {
                font,
                size,
                measured,
                ..
            } => {
                *font = new_font;
                *size = new_size;
                *measured = new_measured;
                Ok(())
            }
            other => Err(CanvasError::Unsupported {
                op: "changing the font",
                kind: other.name(),
            }),
        }
    }

    /// Paints matching shapes after everything else.
    pub fn raise_to_front<'a>(&mut self, target: impl Into<Target<'a>>) {
        let target = target.into();
        let (kept, moved) = self.partition(target);
        self.shapes = kept;
        self.shapes.extend(moved);
    }

    /// Paints matching shapes before everything else.
    pub fn lower_to_back<'a>(&mut self, target: impl Into<Target<'a>>) {
        let target = target.into();
        let (kept, moved) = self.partition(target);
        self.shapes = moved;
        self.shapes.extend(kept);
    }

    /// Moves matching shapes to sit just above the topmost shape matching
    /// `above`. Does nothing when either side matches nothing.
    pub fn raise_above<'a, 'b>(
        &mut self,
        target: impl Into<Target<'a>>,
        above: impl Into<Target<'b>>,
    ) {
        let target = target.into();
        let above = above.into();
        let moved: Vec<usize> = self.matching_indices(target);
        if moved.is_empty() {
            return;
        }
        let anchor = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(i, s)| !moved.contains(i) && Self::matches(s, above))
            .map(|(i, _)| i)
            .last();
        let Some(anchor) = anchor else { return };
        let at = anchor - moved.iter().filter(|&&i| i < anchor).count() + 1;
        self.replant(moved, at);
    }

    /// Moves matching shapes to sit just below the bottom shape matching
    /// `below`. Does nothing when either side matches nothing.
    pub fn lower_below<'a, 'b>(
        &mut self,
        target: impl Into<Target<'a>>,
        below: impl Into<Target<'b>>,
    ) {
        let target = target.into();
        let below = below.into();
        let moved: Vec<usize> = self.matching_indices(target);
        if moved.is_empty() {
            return;
        }
        let anchor = self
            .shapes
            .iter()
            .enumerate()
            .find(|(i, s)| !moved.contains(i) && Self::matches(s, below))
            .map(|(i, _)| i);
        let Some(anchor) = anchor else { return };
        let at = anchor - moved.iter().filter(|&&i| i < anchor).count();
        self.replant(moved, at);
    }

    /// Removes matching shapes. Matching nothing is fine.
    pub fn delete<'a>(&mut self, target: impl Into<Target<'a>>) {
        let target = target.into();
        self.shapes.retain(|s| !Self::matches(s, target));
    }

    /// Removes every shape. The background color stays.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    fn matching_indices(&self, target: Target<'_>) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| Self::matches(s, target))
            .map(|(i, _)| i)
            .collect()
    }

    fn partition(&mut self, target: Target<'_>) -> (Vec<Shape>, Vec<Shape>) {
        let mut kept = Vec::with_capacity(self.shapes.len());
        let mut moved = Vec::new();
        for shape in self.shapes.drain(..) {
            if Self::matches(&shape, target) {
                moved.push(shape);
            } else {
                kept.push(shape);
            }
        }
        (kept, moved)
    }

    /// Pulls the shapes at `indices` out and re-inserts them, in order,
    /// starting at `at` (an index into the remaining list).
    fn replant(&mut self, indices: Vec<usize>, at: usize) {
        let mut taken = Vec::with_capacity(indices.len());
        for &i in indices.iter().rev() {
            taken.push(self.shapes.remove(i));
        }
        taken.reverse();
        for (offset, shape) in taken.into_iter().enumerate() {
            self.shapes.insert(at + offset, shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_text_style() -> TextStyle {
        TextStyle::new()
    }

    #[test]
    fn test_shapes_paint_in_creation_order() {
        let mut scene = Scene::new();
        let a = scene.add_oval(0.0, 0.0, 10.0, 10.0, Style::new());
        let b = scene.add_rectangle(0.0, 0.0, 10.0, 10.0, Style::new());
        let c = scene.add_oval(5.0, 5.0, 15.0, 15.0, Style::new());
        assert_eq!(scene.paint_order(), vec![a, b, c]);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_default_style_is_hollow_with_thin_black_outline() {
        let mut scene = Scene::new();
        scene.add_oval(0.0, 0.0, 10.0, 10.0, Style::new());
        let shape = scene.iter().next().unwrap();
        assert_eq!(shape.fill, None);
        assert_eq!(shape.outline, Some(Color::BLACK));
        assert_eq!(shape.outline_width, 1.0);
    }

    #[test]
    fn test_corners_normalize() {
        let mut scene = Scene::new();
        let id = scene.add_rectangle(40.0, 60.0, 10.0, 20.0, Style::new());
        assert_eq!(scene.left_x(id).unwrap(), 10.0);
        assert_eq!(scene.top_y(id).unwrap(), 20.0);
        assert_eq!(scene.width_of(id).unwrap(), 30.0);
        assert_eq!(scene.height_of(id).unwrap(), 40.0);
    }

    #[test]
    fn test_move_by_tag_moves_every_tagged_shape() {
        let mut scene = Scene::new();
        let w1 = scene.add_oval(0.0, 85.0, 60.0, 115.0, Style::new().tag("wave"));
        let w2 = scene.add_oval(60.0, 85.0, 120.0, 115.0, Style::new().tag("wave"));
        let sun = scene.add_oval(265.0, 0.0, 335.0, 70.0, Style::new());

        scene.move_by("wave", -0.5, 0.0);
        scene.move_by("wave", -0.5, 0.0);

        assert_eq!(scene.left_x(w1).unwrap(), -1.0);
        assert_eq!(scene.left_x(w2).unwrap(), 59.0);
        assert_eq!(scene.left_x(sun).unwrap(), 265.0);
    }

    #[test]
    fn test_fractional_moves_accumulate() {
        let mut scene = Scene::new();
        let id = scene.add_oval(90.0, 40.0, 140.0, 80.0, Style::new());

        let mut expected = 90.0;
        for _ in 0..7 {
            scene.move_by(id, 0.1, 0.0);
            expected += 0.1;
        }
        assert_eq!(scene.left_x(id).unwrap(), expected);
    }

    #[test]
    fn test_moving_an_unknown_target_changes_nothing() {
        let mut scene = Scene::new();
        let id = scene.add_oval(10.0, 10.0, 20.0, 20.0, Style::new());
        scene.move_by("no-such-tag", 100.0, 100.0);
        assert_eq!(scene.left_x(id).unwrap(), 10.0);
        assert_eq!(scene.top_y(id).unwrap(), 10.0);
    }

    #[test]
    fn test_move_to_places_the_top_left_corner() {
        let mut scene = Scene::new();
        let id = scene.add_oval(10.0, 20.0, 40.0, 60.0, Style::new());
        scene.move_to(id, 100.0, 200.0).unwrap();
        assert_eq!(scene.left_x(id).unwrap(), 100.0);
        assert_eq!(scene.top_y(id).unwrap(), 200.0);
        assert_eq!(scene.width_of(id).unwrap(), 30.0);
        assert_eq!(scene.height_of(id).unwrap(), 40.0);
    }

    #[test]
    fn test_text_edges_use_center_math_whatever_the_anchor() {
        let mut scene = Scene::new();
        let style = plain_text_style().anchor(Anchor::West);
        let id =
            scene.add_text(200.0, 130.0, "Good Night!".into(), &style, FontId(0), (100.0, 40.0));
        // Tk would report the true left edge (200); this API mirrors the
        // center-based arithmetic teaching programs rely on.
        assert_eq!(scene.left_x(id).unwrap(), 150.0);
        assert_eq!(scene.top_y(id).unwrap(), 110.0);
        assert_eq!(scene.width_of(id).unwrap(), 100.0);
        assert_eq!(scene.height_of(id).unwrap(), 40.0);
    }

    #[test]
    fn test_set_fill_rejects_images() {
        let mut scene = Scene::new();
        let data = ImageData { width: 2, height: 2, rgba: vec![0; 16] };
        let id = scene.add_image(0.0, 0.0, data);
        let err = scene.set_fill(id, Some(Color::RED)).unwrap_err();
        assert!(matches!(err, CanvasError::Unsupported { kind: "image", .. }));
    }

    #[test]
    fn test_set_outline_rejects_text() {
        let mut scene = Scene::new();
        let style = plain_text_style();
        let id = scene.add_text(0.0, 0.0, "hi".into(), &style, FontId(0), (10.0, 10.0));
        let err = scene.set_outline(id, Some(Color::RED)).unwrap_err();
        assert!(matches!(err, CanvasError::Unsupported { kind: "text", .. }));
    }

    #[test]
    fn test_clearing_fill_and_outline() {
        let mut scene = Scene::new();
        let id = scene.add_rectangle(0.0, 0.0, 10.0, 10.0, Style::new().fill(Color::RED));
        scene.set_fill(id, None).unwrap();
        scene.set_outline(id, None).unwrap();
        let shape = scene.iter().next().unwrap();
        assert_eq!(shape.fill, None);
        assert_eq!(shape.outline, None);
    }

    #[test]
    fn test_set_fill_by_tag_skips_nothing() {
        let mut scene = Scene::new();
        let a = scene.add_oval(0.0, 0.0, 10.0, 10.0, Style::new().tag("sky"));
        let b = scene.add_rectangle(0.0, 0.0, 10.0, 10.0, Style::new().tag("sky"));
        scene.set_fill("sky", Some(Color::BLUE)).unwrap();
        for id in [a, b] {
            let shape = scene.iter().find(|s| s.id == id).unwrap();
            assert_eq!(shape.fill, Some(Color::BLUE));
        }
    }

    #[test]
    fn test_raise_and_lower_to_the_edges() {
        let mut scene = Scene::new();
        let a = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let b = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let c = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());

        scene.raise_to_front(a);
        assert_eq!(scene.paint_order(), vec![b, c, a]);

        scene.lower_to_back(c);
        assert_eq!(scene.paint_order(), vec![c, b, a]);
    }

    #[test]
    fn test_raise_above_and_lower_below_an_anchor() {
        let mut scene = Scene::new();
        let a = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let b = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let c = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let d = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());

        scene.raise_above(a, b);
        assert_eq!(scene.paint_order(), vec![b, a, c, d]);

        scene.lower_below(d, a);
        assert_eq!(scene.paint_order(), vec![b, d, a, c]);
    }

    #[test]
    fn test_stacking_a_tag_interleaved_with_other_shapes() {
        let mut scene = Scene::new();
        let w1 = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));
        let a = scene.add_rectangle(0.0, 0.0, 1.0, 1.0, Style::new());
        let w2 = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));
        let b = scene.add_rectangle(0.0, 0.0, 1.0, 1.0, Style::new());

        // Both waves gather directly above the anchor, keeping their own
        // order.
        scene.raise_above("wave", a);
        assert_eq!(scene.paint_order(), vec![a, w1, w2, b]);

        scene.lower_below("wave", a);
        assert_eq!(scene.paint_order(), vec![w1, w2, a, b]);
    }

    #[test]
    fn test_two_moves_compose_into_one() {
        let mut scene = Scene::new();
        let twice = scene.add_oval(10.0, 20.0, 30.0, 40.0, Style::new());
        let once = scene.add_oval(10.0, 20.0, 30.0, 40.0, Style::new());

        scene.move_by(twice, 3.5, -1.25);
        scene.move_by(twice, 3.5, -1.25);
        scene.move_by(once, 7.0, -2.5);

        assert_eq!(scene.left_x(twice).unwrap(), scene.left_x(once).unwrap());
        assert_eq!(scene.top_y(twice).unwrap(), scene.top_y(once).unwrap());
    }

    #[test]
    fn test_stacking_with_a_missing_anchor_is_a_no_op() {
        let mut scene = Scene::new();
        let a = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        let b = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        scene.raise_above(a, "nothing");
        scene.lower_below(b, "nothing");
        assert_eq!(scene.paint_order(), vec![a, b]);
    }

    #[test]
    fn test_raise_a_whole_tag_preserves_its_internal_order() {
        let mut scene = Scene::new();
        let w1 = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));
        let sea = scene.add_rectangle(0.0, 0.0, 1.0, 1.0, Style::new());
        let w2 = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));

        scene.raise_to_front("wave");
        assert_eq!(scene.paint_order(), vec![sea, w1, w2]);
    }

    #[test]
    fn test_delete_by_tag_removes_every_match() {
        let mut scene = Scene::new();
        let w1 = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));
        let sun = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        scene.delete("wave");

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.paint_order(), vec![sun]);
        assert!(matches!(
            scene.left_x(w1),
            Err(CanvasError::UnknownShape(_))
        ));
    }

    #[test]
    fn test_clear_removes_everything_but_the_background() {
        let mut scene = Scene::new();
        scene.set_background(Color::BLUE);
        scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        scene.add_rectangle(0.0, 0.0, 1.0, 1.0, Style::new().tag("wave"));
        assert_eq!(scene.len(), 2);
        assert!(!scene.is_empty());

        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.background(), Color::BLUE);
    }

    #[test]
    fn test_hidden_state_round_trips() {
        let mut scene = Scene::new();
        let id = scene.add_oval(0.0, 0.0, 1.0, 1.0, Style::new());
        assert!(!scene.is_hidden(id).unwrap());
        scene.set_hidden(id, true);
        assert!(scene.is_hidden(id).unwrap());
        scene.set_hidden(id, false);
        assert!(!scene.is_hidden(id).unwrap());
    }

    #[test]
    fn test_set_text_remeasures() {
        let mut scene = Scene::new();
        let style = plain_text_style();
        let id = scene.add_text(50.0, 50.0, "hi".into(), &style, FontId(0), (20.0, 10.0));
        scene.set_text(id, "hello there".into(), (110.0, 10.0)).unwrap();
        assert_eq!(scene.text(id).unwrap(), "hello there");
        assert_eq!(scene.width_of(id).unwrap(), 110.0);
        assert_eq!(scene.left_x(id).unwrap(), 50.0 - 55.0);
    }
}
