use egui::{CursorIcon, Rect};
use std::path::PathBuf;

use crate::error::ExportError;
use crate::export;

/// What the drawing controller needs from the environment embedding it.
pub trait SurfaceHost {
    /// On-screen box of the main surface, in logical points.
    fn bounding_box(&self) -> Rect;

    /// Device pixels per logical point.
    fn pixels_per_point(&self) -> f32;

    fn set_cursor(&mut self, cursor: CursorIcon);

    /// Places the overlay above the main surface at `placement`.
    fn attach_overlay(&mut self, placement: Rect);

    fn move_overlay(&mut self, placement: Rect);

    fn detach_overlay(&mut self);

    /// Hands an encoded image to the user as a download named `file_name`.
    fn download(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Host backed by an egui canvas region, refreshed every frame.
#[derive(Debug, Clone)]
pub struct EguiHost {
    canvas_rect: Rect,
    pixels_per_point: f32,
    cursor: CursorIcon,
    overlay_placement: Option<Rect>,
    export_dir: Option<PathBuf>,
}

impl EguiHost {
    pub fn new(export_dir: Option<PathBuf>) -> Self {
        Self {
            canvas_rect: Rect::NOTHING,
            pixels_per_point: 1.0,
            cursor: CursorIcon::Default,
            overlay_placement: None,
            export_dir,
        }
    }

    /// Records the canvas region and scale egui laid out this frame.
    pub fn update_frame(&mut self, canvas_rect: Rect, pixels_per_point: f32) {
        self.canvas_rect = canvas_rect;
        self.pixels_per_point = pixels_per_point;
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn overlay_placement(&self) -> Option<Rect> {
        self.overlay_placement
    }
}

impl SurfaceHost for EguiHost {
    fn bounding_box(&self) -> Rect {
        if self.canvas_rect.is_positive() {
            self.canvas_rect
        } else {
            Rect::ZERO
        }
    }

    fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor = cursor;
    }

    fn attach_overlay(&mut self, placement: Rect) {
        self.overlay_placement = Some(placement);
    }

    fn move_overlay(&mut self, placement: Rect) {
        if self.overlay_placement.is_some() {
            self.overlay_placement = Some(placement);
        }
    }

    fn detach_overlay(&mut self) {
        self.overlay_placement = None;
    }

    fn download(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        export::deliver_download(file_name, bytes, self.export_dir.as_deref())
    }
}
