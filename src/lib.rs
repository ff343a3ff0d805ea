// filepath: src/lib.rs
//! A Tk-style drawing canvas for Wayland desktops.
//!
//! Programs create a [`Canvas`], add shapes to it, mutate them, and call
//! [`Canvas::update`] once per animation frame. Input arrives through
//! buffered queues ([`Canvas::take_mouse_clicks`],
//! [`Canvas::take_key_presses`]) or through callbacks.

pub mod canvas;
pub mod color;
pub mod error;
pub mod event;
pub mod font;
pub mod raster;
pub mod scene;
mod wayland;

// Re-export the surface most programs touch.
pub use crate::canvas::{Canvas, DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH};
pub use crate::color::Color;
pub use crate::error::CanvasError;
pub use crate::event::{Key, MouseClick};
pub use crate::scene::{Anchor, ImageData, Scene, ShapeId, Style, Target, TextStyle};
