#![allow(dead_code)]

use eframe_sketchpad::{DrawingSurfaceController, ExportError, PadConfig, SurfaceEvent, SurfaceHost};
use egui::{CursorIcon, Pos2, Rect, pos2, vec2};

/// Host that records everything the controller asks of it
#[derive(Debug)]
pub struct MockHost {
    pub rect: Rect,
    pub pixels_per_point: f32,
    pub cursor: CursorIcon,
    pub cursor_history: Vec<CursorIcon>,
    pub overlay_placement: Option<Rect>,
    pub attach_count: usize,
    pub detach_count: usize,
    pub downloads: Vec<(String, Vec<u8>)>,
    pub fail_downloads: bool,
}

impl MockHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            rect: Rect::from_min_size(pos2(20.0, 40.0), vec2(width, height)),
            pixels_per_point: 1.0,
            cursor: CursorIcon::Default,
            cursor_history: Vec::new(),
            overlay_placement: None,
            attach_count: 0,
            detach_count: 0,
            downloads: Vec::new(),
            fail_downloads: false,
        }
    }
}

impl SurfaceHost for MockHost {
    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.cursor = cursor;
        self.cursor_history.push(cursor);
    }

    fn attach_overlay(&mut self, placement: Rect) {
        self.attach_count += 1;
        self.overlay_placement = Some(placement);
    }

    fn move_overlay(&mut self, placement: Rect) {
        self.overlay_placement = Some(placement);
    }

    fn detach_overlay(&mut self) {
        self.detach_count += 1;
        self.overlay_placement = None;
    }

    fn download(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        if self.fail_downloads {
            return Err(ExportError::Browser("download blocked".to_owned()));
        }
        self.downloads.push((file_name.to_owned(), bytes.to_vec()));
        Ok(())
    }
}

pub type TestController = DrawingSurfaceController<MockHost>;

pub fn controller(width: f32, height: f32) -> TestController {
    DrawingSurfaceController::new(MockHost::new(width, height), PadConfig::default())
}

pub fn initialized(width: f32, height: f32) -> TestController {
    let mut controller = controller(width, height);
    controller.init();
    controller
}

pub fn down(controller: &mut TestController, pos: Pos2) {
    controller.dispatch(&SurfaceEvent::PointerDown { pos });
}

pub fn drag(controller: &mut TestController, pos: Pos2) {
    controller.dispatch(&SurfaceEvent::PointerMove { pos });
}

pub fn up(controller: &mut TestController, pos: Pos2) {
    controller.dispatch(&SurfaceEvent::PointerUp { pos });
}

/// Raw RGBA bytes of the main surface
pub fn main_pixels(controller: &TestController) -> Vec<u8> {
    controller
        .main_surface()
        .map(|surface| surface.image().as_raw().clone())
        .unwrap_or_default()
}

pub fn main_is_blank(controller: &TestController) -> bool {
    main_pixels(controller).chunks(4).all(|pixel| pixel[3] == 0)
}
