// filepath: src/canvas.rs
//! The canvas window: retained shapes on a Wayland surface.
//!
//! [`Canvas`] owns the compositor connection and a [`CanvasState`] that the
//! protocol handlers in `wayland.rs` feed. Drawing is explicit: mutating a
//! shape changes the display list only, and the next [`Canvas::update`]
//! renders it and hands the compositor a fresh buffer.

use std::io;
use std::num::NonZeroU32;
use std::path::Path;

use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        xdg::{
            window::{Window, WindowDecorations},
            XdgShell,
        },
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm},
};
use wayland_client::{
    backend::WaylandError,
    globals::registry_queue_init,
    protocol::{wl_keyboard, wl_pointer, wl_shm},
    Connection, EventQueue,
};

use crate::color::Color;
use crate::error::CanvasError;
use crate::event::{Input, Key, MouseClick};
use crate::font::FontStore;
use crate::raster::{render_scene, Frame};
use crate::scene::{ImageData, Scene, ShapeId, Style, Target, TextStyle};

/// Window size used when the caller does not pick one.
pub const DEFAULT_WIDTH: u32 = 754;
pub const DEFAULT_HEIGHT: u32 = 492;
pub const DEFAULT_TITLE: &str = "Canvas";

/// Everything the Wayland handlers touch: globals, the window, the display
/// list and the input queues.
pub(crate) struct CanvasState {
    pub(crate) registry_state: RegistryState,
    pub(crate) output_state: OutputState,
    pub(crate) seat_state: SeatState,
    pub(crate) shm: Shm,
    pub(crate) window: Option<Window>,
    pub(crate) pool: SlotPool,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) configured: bool,
    pub(crate) pointer: Option<wl_pointer::WlPointer>,
    pub(crate) keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(crate) scene: Scene,
    pub(crate) input: Input,
    pub(crate) fonts: FontStore,
}

impl CanvasState {
    /// Renders the scene into a fresh shm buffer and commits it.
    pub(crate) fn draw(&mut self) -> Result<(), CanvasError> {
        if !self.configured {
            debug!("draw() called before the surface is configured, skipping");
            return Ok(());
        }
        let Some(window) = &self.window else {
            return Ok(());
        };

        let width = self.width;
        let height = self.height;
        let stride = width as i32 * 4;

        let (buffer, pixels) =
            self.pool
                .create_buffer(width as i32, height as i32, stride, wl_shm::Format::Argb8888)?;

        let mut frame = Frame::new(pixels, width, height);
        render_scene(&mut frame, &self.scene, &self.fonts);

        buffer.attach_to(window.wl_surface())?;
        window
            .wl_surface()
            .damage_buffer(0, 0, width as i32, height as i32);
        window.wl_surface().commit();
        Ok(())
    }

    pub(crate) fn apply_configure(&mut self, new_size: (Option<NonZeroU32>, Option<NonZeroU32>)) {
        let width = new_size.0.map(NonZeroU32::get).unwrap_or(self.width);
        let height = new_size.1.map(NonZeroU32::get).unwrap_or(self.height);
        let resized = width != self.width || height != self.height;
        let first = !self.configured;

        self.width = width;
        self.height = height;
        self.configured = true;

        if first || resized {
            info!("surface configured at {width}x{height}");
            if let Err(err) = self.draw() {
                warn!("redraw after configure failed: {err}");
            }
        }
    }

    pub(crate) fn close(&mut self) {
        self.window = None;
        info!("window closed");
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.window.is_none()
    }
}

/// A window whose contents are shapes the program creates and mutates.
///
/// Nothing repaints on its own: call [`Canvas::update`] to process input
/// and push the current scene to the screen. This is what lets simple
/// frame-by-frame animation loops work.
pub struct Canvas {
    conn: Connection,
    event_queue: EventQueue<CanvasState>,
    state: CanvasState,
}

impl Canvas {
    /// Opens a canvas window with the default size and title.
    pub fn open() -> Result<Canvas, CanvasError> {
        Canvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_TITLE)
    }

    /// Opens a `width` x `height` canvas window. Blocks until the
    /// compositor has configured the surface and the first (empty) frame
    /// is on screen.
    pub fn new(width: u32, height: u32, title: &str) -> Result<Canvas, CanvasError> {
        let conn = Connection::connect_to_env()?;
        let (globals, mut event_queue) = registry_queue_init(&conn)?;
        let qh = event_queue.handle();

        let compositor = CompositorState::bind(&globals, &qh)?;
        let xdg_shell = XdgShell::bind(&globals, &qh)?;
        let shm = Shm::bind(&globals, &qh)?;
        let seat_state = SeatState::new(&globals, &qh);

        let pool = SlotPool::new(width as usize * height as usize * 4, &shm)?;

        let surface = compositor.create_surface(&qh);
        let window = xdg_shell.create_window(surface, WindowDecorations::RequestServer, &qh);
        window.set_title(title);
        window.set_app_id("easel");
        // A canvas has one fixed size; let the compositor know both bounds.
        window.set_min_size(Some((width, height)));
        window.set_max_size(Some((width, height)));
        window.commit();

        let mut state = CanvasState {
            registry_state: RegistryState::new(&globals),
            output_state: OutputState::new(&globals, &qh),
            seat_state,
            shm,
            window: Some(window),
            pool,
            width,
            height,
            configured: false,
            pointer: None,
            keyboard: None,
            scene: Scene::new(),
            input: Input::default(),
            fonts: FontStore::new(),
        };

        info!("waiting for the first configure");
        while !state.configured && !state.is_closed() {
            event_queue.blocking_dispatch(&mut state)?;
        }
        info!("canvas ready: {width}x{height} \"{title}\"");

        Ok(Canvas {
            conn,
            event_queue,
            state,
        })
    }

    /// Processes pending input events and repaints the window from the
    /// current scene. Animation loops call this once per frame.
    pub fn update(&mut self) -> Result<(), CanvasError> {
        self.pump()?;
        self.state.draw()?;
        self.conn.flush()?;
        Ok(())
    }

    /// Ingests whatever the compositor has sent without blocking.
    fn pump(&mut self) -> Result<(), CanvasError> {
        self.event_queue.dispatch_pending(&mut self.state)?;
        self.conn.flush()?;
        if let Some(guard) = self.event_queue.prepare_read() {
            match guard.read() {
                Ok(_) => {}
                Err(WaylandError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {}
                Err(err) => return Err(err.into()),
            }
        }
        self.event_queue.dispatch_pending(&mut self.state)?;
        Ok(())
    }

    /// True once the user has closed the window.
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Blocks until the user closes the window.
    pub fn wait_for_close(&mut self) -> Result<(), CanvasError> {
        self.state.draw()?;
        while !self.state.is_closed() {
            self.event_queue.blocking_dispatch(&mut self.state)?;
        }
        Ok(())
    }

    /// Blocks until the user clicks: a left-button press followed by its
    /// release. The click is returned and not queued. Key presses arriving
    /// meanwhile still queue.
    pub fn wait_for_click(&mut self) -> Result<MouseClick, CanvasError> {
        self.state.input.begin_wait();
        self.state.draw()?;
        loop {
            if self.state.is_closed() {
                self.state.input.abort_wait();
                return Err(CanvasError::WindowClosed);
            }
            if let Some(click) = self.state.input.finish_wait() {
                return Ok(click);
            }
            self.event_queue.blocking_dispatch(&mut self.state)?;
        }
    }

    pub fn width(&self) -> u32 {
        self.state.width
    }

    pub fn height(&self) -> u32 {
        self.state.height
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(window) = &self.state.window {
            window.set_title(title);
            window.commit();
        }
    }

    /// Asks the compositor for a new fixed size. Takes effect on the next
    /// configure.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.state.width = width;
        self.state.height = height;
        if let Some(window) = &self.state.window {
            window.set_min_size(Some((width, height)));
            window.set_max_size(Some((width, height)));
            window.commit();
        }
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.state.scene.set_background(color);
    }

    // ----- shape creation -------------------------------------------------

    pub fn create_oval(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, style: Style) -> ShapeId {
        self.state.scene.add_oval(x0, y0, x1, y1, style)
    }

    pub fn create_rectangle(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        style: Style,
    ) -> ShapeId {
        self.state.scene.add_rectangle(x0, y0, x1, y1, style)
    }

    /// Creates a text shape anchored at `(x, y)`. The font family in
    /// `style` is looked up on the system, with a sans-serif fallback.
    pub fn create_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        style: TextStyle,
    ) -> Result<ShapeId, CanvasError> {
        let font = self.state.fonts.resolve(style.family.as_deref())?;
        let measured = self.state.fonts.measure(font, style.size, text);
        Ok(self
            .state
            .scene
            .add_text(x, y, text.to_string(), &style, font, measured))
    }

    /// Loads an image file and places it with its top-left at `(x, y)`.
    pub fn create_image(
        &mut self,
        x: f64,
        y: f64,
        path: impl AsRef<Path>,
    ) -> Result<ShapeId, CanvasError> {
        let data = decode_image(path.as_ref(), None)?;
        Ok(self.state.scene.add_image(x, y, data))
    }

    /// Like [`Canvas::create_image`], but scales the pixels to
    /// `width` x `height` first.
    pub fn create_image_with_size(
        &mut self,
        x: f64,
        y: f64,
        width: u32,
        height: u32,
        path: impl AsRef<Path>,
    ) -> Result<ShapeId, CanvasError> {
        let data = decode_image(path.as_ref(), Some((width, height)))?;
        Ok(self.state.scene.add_image(x, y, data))
    }

    // ----- shape queries and mutation -------------------------------------

    /// Shifts every shape matching `target` by `(dx, dy)`. Fractions
    /// accumulate, so repeated small moves drift smoothly.
    pub fn move_by<'a>(&mut self, target: impl Into<Target<'a>>, dx: f64, dy: f64) {
        self.state.scene.move_by(target, dx, dy);
    }

    /// Moves one shape so its top-left corner lands on `(x, y)`.
    pub fn move_to(&mut self, id: ShapeId, x: f64, y: f64) -> Result<(), CanvasError> {
        self.state.scene.move_to(id, x, y)
    }

    pub fn left_x(&self, id: ShapeId) -> Result<f64, CanvasError> {
        self.state.scene.left_x(id)
    }

    pub fn top_y(&self, id: ShapeId) -> Result<f64, CanvasError> {
        self.state.scene.top_y(id)
    }

    pub fn shape_width(&self, id: ShapeId) -> Result<f64, CanvasError> {
        self.state.scene.width_of(id)
    }

    pub fn shape_height(&self, id: ShapeId) -> Result<f64, CanvasError> {
        self.state.scene.height_of(id)
    }

    /// Recolors the fill of every matching shape. Images cannot be filled.
    pub fn set_fill_color<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        color: Color,
    ) -> Result<(), CanvasError> {
        self.state.scene.set_fill(target, Some(color))
    }

    /// Removes the fill, leaving matching shapes hollow.
    pub fn clear_fill<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<(), CanvasError> {
        self.state.scene.set_fill(target, None)
    }

    pub fn set_outline_color<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        color: Color,
    ) -> Result<(), CanvasError> {
        self.state.scene.set_outline(target, Some(color))
    }

    pub fn clear_outline<'a>(&mut self, target: impl Into<Target<'a>>) -> Result<(), CanvasError> {
        self.state.scene.set_outline(target, None)
    }

    pub fn set_outline_width<'a>(
        &mut self,
        target: impl Into<Target<'a>>,
        width: f32,
    ) -> Result<(), CanvasError> {
        self.state.scene.set_outline_width(target, width)
    }

    /// Hides matching shapes without forgetting them.
    pub fn set_hidden<'a>(&mut self, target: impl Into<Target<'a>>, hidden: bool) {
        self.state.scene.set_hidden(target, hidden);
    }

    /// Replaces a text shape's string and re-measures it.
    pub fn set_text(&mut self, id: ShapeId, text: &str) -> Result<(), CanvasError> {
        let (font, size, _) = self.state.scene.text_details(id)?;
        let measured = self.state.fonts.measure(font, size, text);
        self.state.scene.set_text(id, text.to_string(), measured)
    }

    pub fn text(&self, id: ShapeId) -> Result<&str, CanvasError> {
        self.state.scene.text(id)
    }

    /// Changes a text shape's font family and size.
    pub fn set_font(&mut self, id: ShapeId, family: &str, size: f32) -> Result<(), CanvasError> {
        let (_, _, text) = self.state.scene.text_details(id)?;
        let text = text.to_string();
        let font = self.state.fonts.resolve(Some(family))?;
        let measured = self.state.fonts.measure(font, size, &text);
        self.state.scene.set_font(id, font, size, measured)
    }

    pub fn raise_to_front<'a>(&mut self, target: impl Into<Target<'a>>) {
        self.state.scene.raise_to_front(target);
    }

    pub fn lower_to_back<'a>(&mut self, target: impl Into<Target<'a>>) {
        self.state.scene.lower_to_back(target);
    }

    pub fn raise_above<'a, 'b>(
        &mut self,
        target: impl Into<Target<'a>>,
        above: impl Into<Target<'b>>,
    ) {
        self.state.scene.raise_above(target, above);
    }

    pub fn lower_below<'a, 'b>(
        &mut self,
        target: impl Into<Target<'a>>,
        below: impl Into<Target<'b>>,
    ) {
        self.state.scene.lower_below(target, below);
    }

    /// Deletes every matching shape. Their ids become invalid.
    pub fn delete<'a>(&mut self, target: impl Into<Target<'a>>) {
        self.state.scene.delete(target);
    }

    /// Deletes every shape, keeping the background color.
    pub fn clear(&mut self) {
        self.state.scene.clear();
    }

    // ----- input ----------------------------------------------------------

    /// All left-button presses since the last call, oldest first.
    pub fn take_mouse_clicks(&mut self) -> Vec<MouseClick> {
        self.state.input.take_clicks()
    }

    /// All key presses since the last call, oldest first.
    pub fn take_key_presses(&mut self) -> Vec<Key> {
        self.state.input.take_keys()
    }

    /// Routes left-button presses to `callback` instead of the queue.
    pub fn set_on_mouse_pressed(&mut self, callback: impl FnMut(f64, f64) + 'static) {
        self.state.input.set_on_mouse_pressed(Some(Box::new(callback)));
    }

    /// Removes the press callback; presses queue again.
    pub fn clear_on_mouse_pressed(&mut self) {
        self.state.input.set_on_mouse_pressed(None);
    }

    /// Routes left-button releases to `callback`. Releases are never
    /// queued, so without a callback they are dropped.
    pub fn set_on_mouse_released(&mut self, callback: impl FnMut(f64, f64) + 'static) {
        self.state.input.set_on_mouse_released(Some(Box::new(callback)));
    }

    /// Removes the release callback; releases are dropped again.
    pub fn clear_on_mouse_released(&mut self) {
        self.state.input.set_on_mouse_released(None);
    }

    /// Routes key presses to `callback` instead of the queue.
    pub fn set_on_key_pressed(&mut self, callback: impl FnMut(Key) + 'static) {
        self.state.input.set_on_key_pressed(Some(Box::new(callback)));
    }

    /// Removes the key callback; key presses queue again.
    pub fn clear_on_key_pressed(&mut self) {
        self.state.input.set_on_key_pressed(None);
    }

    /// Pointer x at the last processed event batch.
    pub fn mouse_x(&self) -> f64 {
        self.state.input.pointer().0
    }

    /// Pointer y at the last processed event batch.
    pub fn mouse_y(&self) -> f64 {
        self.state.input.pointer().1
    }

    pub fn mouse_on_canvas(&self) -> bool {
        self.state.input.pointer_on_canvas()
    }
}

fn decode_image(path: &Path, size: Option<(u32, u32)>) -> Result<ImageData, CanvasError> {
    let img = image::open(path).map_err(|source| CanvasError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let img = match size {
        Some((width, height)) => {
            img.resize_exact(width, height, image::imageops::FilterType::Triangle)
        }
        None => img,
    };
    let rgba = img.to_rgba8();
    Ok(ImageData {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
