//! The drawing controller of the sketchpad, owning the main and overlay surfaces
//! and turning pointer and resize events into drawing calls.
//!
//! The controller keeps a single `DrawingState` record. Between `init` and
//! `dispose` it listens for pointer events on the main surface and for resize
//! events on the window; the host forwards them through `dispatch`.
//!
//! # Lifecycle
//!
//! - `init`: allocate both surfaces at the host box scaled by the device pixel
//!   ratio, attach the overlay, register listeners, draw the grid
//! - `dispose`: remove listeners, detach and drop the overlay
//!
//! Outside that window every operation returns without doing anything.
//!
//! # Example
//!
//! ```rust,no_run
//! use eframe_sketchpad::{DrawingSurfaceController, EguiHost, PadConfig, PaintTool, SurfaceEvent};
//!
//! let mut controller = DrawingSurfaceController::new(EguiHost::new(None), PadConfig::default());
//! controller.init();
//! controller.set_tool(PaintTool::Eraser);
//! controller.dispatch(&SurfaceEvent::PointerDown { pos: egui::pos2(4.0, 4.0) });
//! controller.dispose();
//! ```

use egui::{Color32, CursorIcon, Pos2, Rect};
use image::RgbaImage;

use crate::config::PadConfig;
use crate::event::{EventKind, ListenerRegistry, SurfaceEvent};
use crate::export;
use crate::grid;
use crate::host::SurfaceHost;
use crate::surface::Surface;
use crate::tool::PaintTool;
use crate::util::time;

/// Line width of the eraser preview rectangle on the overlay
const PREVIEW_LINE_WIDTH: f32 = 2.0;

const SURFACE_LISTENERS: [EventKind; 4] = [
    EventKind::PointerDown,
    EventKind::PointerMove,
    EventKind::PointerUp,
    EventKind::PointerCancel,
];

const WINDOW_LISTENERS: [EventKind; 1] = [EventKind::Resize];

/// A partial update of the main surface's paint attributes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StyleUpdate {
    pub stroke_color: Option<Color32>,
    pub line_width: Option<f32>,
}

impl StyleUpdate {
    pub fn stroke_color(color: Color32) -> Self {
        Self {
            stroke_color: Some(color),
            ..Default::default()
        }
    }

    pub fn line_width(width: f32) -> Self {
        Self {
            line_width: Some(width),
            ..Default::default()
        }
    }
}

/// The transient layer and where it sits on screen
#[derive(Debug, Clone)]
pub struct Overlay {
    pub surface: Surface,
    pub placement: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerPhase {
    Down,
    Up,
}

/// Mutable state of one mounted widget.
#[derive(Debug, Default)]
pub(crate) struct DrawingState {
    pub is_drawing: bool,
    pub active_tool: PaintTool,
    main: Option<Surface>,
    overlay: Option<Overlay>,
}

pub struct DrawingSurfaceController<H: SurfaceHost> {
    host: H,
    config: PadConfig,
    state: DrawingState,
    listeners: ListenerRegistry,
}

impl<H: SurfaceHost> DrawingSurfaceController<H> {
    pub fn new(host: H, config: PadConfig) -> Self {
        Self {
            host,
            config: config.validated(),
            state: DrawingState::default(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing
    }

    pub fn active_tool(&self) -> PaintTool {
        self.state.active_tool
    }

    /// True between `init` and `dispose`.
    pub fn is_initialized(&self) -> bool {
        self.state.main.is_some() && self.state.overlay.is_some()
    }

    /// The main surface; it outlives `dispose` until the next `init`.
    pub fn main_surface(&self) -> Option<&Surface> {
        self.state.main.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.state.overlay.as_ref()
    }

    pub fn init(&mut self) {
        if self.state.overlay.is_some() {
            log::debug!("Overlay already attached, skipping init");
            return;
        }

        let placement = self.host.bounding_box();
        let scale = self.device_pixel_ratio();
        let width = (placement.width() * scale).round().max(0.0) as u32;
        let height = (placement.height() * scale).round().max(0.0) as u32;

        let mut main = Surface::new(width, height);
        main.scale(scale, scale);
        main.set_line_width(self.config.default_line_width);
        main.set_stroke_color(self.config.default_stroke_color);

        let mut overlay = Surface::new(width, height);
        overlay.scale(scale, scale);
        overlay.set_line_width(PREVIEW_LINE_WIDTH);

        self.state.main = Some(main);
        self.state.overlay = Some(Overlay {
            surface: overlay,
            placement,
        });
        self.host.attach_overlay(placement);

        for kind in SURFACE_LISTENERS.into_iter().chain(WINDOW_LISTENERS) {
            self.listeners.register(kind);
        }

        self.draw_grid();
        log::debug!("Initialized {width}x{height} surfaces at {placement:?} (dpr {scale})");
    }

    pub fn dispose(&mut self) {
        self.listeners.remove_all();
        self.state.is_drawing = false;

        if self.state.overlay.take().is_some() {
            self.host.detach_overlay();
            log::debug!("Disposed overlay");
        }
    }

    pub fn set_tool(&mut self, tool: PaintTool) {
        if self.state.active_tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.state.active_tool, tool);
        }
        self.state.active_tool = tool;
    }

    pub fn set_style(&mut self, update: StyleUpdate) {
        if !self.is_initialized() {
            log::trace!("Ignoring style update before init");
            return;
        }
        let Some(main) = self.state.main.as_mut() else {
            return;
        };
        if let Some(color) = update.stroke_color {
            main.set_stroke_color(color);
        }
        if let Some(width) = update.line_width {
            main.set_line_width(width);
        }
    }

    /// Clears every stroke and redraws the grid. Tool and style are kept.
    pub fn reset(&mut self) {
        if !self.is_initialized() {
            log::trace!("Ignoring reset before init");
            return;
        }
        self.draw_grid();
        if let Some(main) = self.state.main.as_mut() {
            main.clear();
        }
    }

    /// Overlay and main composited at the host's current on-screen size.
    pub fn snapshot(&self) -> Option<RgbaImage> {
        let (Some(main), Some(overlay)) = (self.state.main.as_ref(), self.state.overlay.as_ref()) else {
            return None;
        };
        let size = self.host.bounding_box().size();
        Some(export::composite(&[&overlay.surface, main], size))
    }

    /// Encodes the current snapshot as JPEG and hands it to the host as
    /// `<unix-millis>.jpg`. Failures are logged.
    pub fn export_image(&mut self) {
        let Some(image) = self.snapshot() else {
            log::trace!("Ignoring export before init");
            return;
        };

        let bytes = match export::encode_jpeg(&image, self.config.jpeg_quality) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("Failed to export drawing: {err}");
                return;
            }
        };

        let file_name = export::export_file_name(time::timestamp_millis());
        if let Err(err) = self.host.download(&file_name, &bytes) {
            log::error!("Failed to deliver {file_name}: {err}");
        }
    }

    /// Routes a host event to its handler if a listener for it is registered.
    pub fn dispatch(&mut self, event: &SurfaceEvent) {
        if !self.listeners.is_listening(event.kind()) {
            log::trace!("No listener for {:?}", event.kind());
            return;
        }

        match *event {
            SurfaceEvent::PointerDown { pos } => self.on_pointer_down(pos),
            SurfaceEvent::PointerMove { pos } => self.on_pointer_move(pos),
            SurfaceEvent::PointerUp { .. } | SurfaceEvent::PointerCancel => self.on_pointer_up(),
            SurfaceEvent::Resize => self.on_resize(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2) {
        if !self.is_initialized() {
            return;
        }
        self.state.is_drawing = true;
        if let Some(main) = self.state.main.as_mut() {
            main.begin_path();
            main.move_to(pos);
        }
        self.update_cursor(PointerPhase::Down);
    }

    fn on_pointer_move(&mut self, pos: Pos2) {
        if !self.state.is_drawing || !self.is_initialized() {
            return;
        }
        match self.state.active_tool {
            PaintTool::Brush => self.handle_brush(pos),
            PaintTool::Eraser => self.handle_eraser(pos),
        }
    }

    fn on_pointer_up(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.state.is_drawing = false;
        if let Some(main) = self.state.main.as_mut() {
            main.close_path();
        }
        self.update_cursor(PointerPhase::Up);
        self.draw_grid();
    }

    fn on_resize(&mut self) {
        let placement = self.host.bounding_box();
        let Some(overlay) = self.state.overlay.as_mut() else {
            return;
        };
        overlay.placement = placement;
        self.host.move_overlay(placement);
        self.draw_grid();
    }

    fn handle_brush(&mut self, pos: Pos2) {
        if let Some(main) = self.state.main.as_mut() {
            main.line_to(pos);
            main.stroke();
        }
    }

    /// One square clear per move event; nothing fills the gap between events.
    fn handle_eraser(&mut self, pos: Pos2) {
        self.draw_grid();

        let size = self.config.eraser_size;
        let (x, y) = (pos.x - size / 2.0, pos.y - size / 2.0);
        if let Some(overlay) = self.state.overlay.as_mut() {
            overlay.surface.stroke_rect(x, y, size, size);
        }
        if let Some(main) = self.state.main.as_mut() {
            main.clear_rect(x, y, size, size);
        }
    }

    fn draw_grid(&mut self) {
        let scale = self.device_pixel_ratio();
        let style = self.config.grid_style();
        if let Some(overlay) = self.state.overlay.as_mut() {
            grid::draw_grid(&mut overlay.surface, &style, scale);
        }
    }

    fn update_cursor(&mut self, phase: PointerPhase) {
        let cursor = match phase {
            PointerPhase::Down => self.state.active_tool.active_cursor(),
            PointerPhase::Up => CursorIcon::Default,
        };
        self.host.set_cursor(cursor);
    }

    fn device_pixel_ratio(&self) -> f32 {
        let scale = self.host.pixels_per_point();
        if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
    }
}
