#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod export;
pub mod grid;
pub mod host;
pub mod input;
mod panels;
pub mod surface;
pub mod texture_manager;
pub mod tool;
pub mod util;

pub use app::SketchpadApp;
pub use config::PadConfig;
pub use controller::{DrawingSurfaceController, Overlay, StyleUpdate};
pub use error::{ConfigError, ExportError};
pub use event::{EventKind, EventTarget, SurfaceEvent};
pub use grid::GridStyle;
pub use host::{EguiHost, SurfaceHost};
pub use input::InputHandler;
pub use surface::Surface;
pub use tool::PaintTool;
