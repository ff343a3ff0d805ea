// filepath: src/error.rs
//! Error type shared across the crate

use std::path::PathBuf;

use smithay_client_toolkit::shm::slot::{ActivateSlotError, CreateBufferError};
use smithay_client_toolkit::shm::CreatePoolError;
use thiserror::Error;
use wayland_client::backend::WaylandError;
use wayland_client::globals::{BindError, GlobalError};
use wayland_client::{ConnectError, DispatchError};

use crate::scene::ShapeId;

/// Everything that can go wrong while driving a canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("failed to connect to the wayland compositor: {0}")]
    Connect(#[from] ConnectError),

    #[error("wayland registry setup failed: {0}")]
    Global(#[from] GlobalError),

    #[error("a required wayland global is missing: {0}")]
    Bind(#[from] BindError),

    #[error("wayland event dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("wayland connection error: {0}")]
    Backend(#[from] WaylandError),

    #[error("failed to create the shared-memory pool: {0}")]
    CreatePool(#[from] CreatePoolError),

    #[error("failed to create a frame buffer: {0}")]
    CreateBuffer(#[from] CreateBufferError),

    #[error("failed to attach a frame buffer: {0}")]
    AttachBuffer(#[from] ActivateSlotError),

    #[error("unknown color `{0}`")]
    UnknownColor(String),

    #[error("no shape with id {0:?}")]
    UnknownShape(ShapeId),

    #[error("{op} is not supported for {kind} shapes")]
    Unsupported {
        op: &'static str,
        kind: &'static str,
    },

    #[error("no usable font found while looking for `{family}`")]
    FontUnavailable { family: String },

    #[error("failed to load image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("the canvas window was closed")]
    WindowClosed,
}
