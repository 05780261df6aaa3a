use egui::{Color32, Rect, pos2};

use crate::config::PadConfig;
use crate::controller::{DrawingSurfaceController, StyleUpdate};
use crate::host::EguiHost;
use crate::input::InputHandler;
use crate::panels;
use crate::surface::Surface;
use crate::texture_manager::{LayerSlot, TextureManager};
use crate::tool::PaintTool;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchpadApp {
    config: PadConfig,
    tool: PaintTool,
    stroke_color: Color32,
    line_width: f32,

    #[serde(skip)]
    controller: Option<DrawingSurfaceController<EguiHost>>,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    textures: TextureManager,
}

impl Default for SketchpadApp {
    fn default() -> Self {
        let config = PadConfig::default();
        Self {
            tool: PaintTool::default(),
            stroke_color: config.default_stroke_color,
            line_width: config.default_line_width,
            config,
            controller: None,
            input: InputHandler::new(),
            textures: TextureManager::new(),
        }
    }
}

impl SketchpadApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        if let Some(config) = PadConfig::from_env() {
            app.config = config;
        }
        app.config = app.config.clone().validated();

        let host = EguiHost::new(app.config.export_dir.clone());
        app.controller = Some(DrawingSurfaceController::new(host, app.config.clone()));
        app
    }

    pub fn tool(&self) -> PaintTool {
        self.tool
    }

    pub fn stroke_color(&self) -> Color32 {
        self.stroke_color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn select_tool(&mut self, tool: PaintTool) {
        self.tool = tool;
        if let Some(controller) = &mut self.controller {
            controller.set_tool(tool);
        }
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.stroke_color = color;
        if let Some(controller) = &mut self.controller {
            controller.set_style(StyleUpdate::stroke_color(color));
        }
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
        if let Some(controller) = &mut self.controller {
            controller.set_style(StyleUpdate::line_width(width));
        }
    }

    pub fn reset(&mut self) {
        if let Some(controller) = &mut self.controller {
            controller.reset();
        }
    }

    pub fn export(&mut self) {
        if let Some(controller) = &mut self.controller {
            controller.export_image();
        }
    }

    /// Feeds this frame's input to the controller and paints both layers.
    pub(crate) fn paint_canvas(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        response: &egui::Response,
    ) {
        let canvas_rect = response.rect;
        if !self.prepare_controller(canvas_rect, ctx.pixels_per_point()) {
            return;
        }
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        for event in self.input.process_input(ctx, canvas_rect) {
            controller.dispatch(&event);
        }

        // overlay sits beneath the main layer
        if let Some(overlay) = controller.overlay() {
            paint_layer(
                &mut self.textures,
                LayerSlot::Overlay,
                &overlay.surface,
                overlay.placement,
                ctx,
                painter,
            );
        }
        if let Some(main) = controller.main_surface() {
            paint_layer(&mut self.textures, LayerSlot::Main, main, canvas_rect, ctx, painter);
        }

        if response.hovered() {
            ctx.set_cursor_icon(controller.host().cursor());
        }
    }

    /// Hands the frame's layout to the host and initializes the controller
    /// once the canvas has an area. Returns whether the controller is ready.
    fn prepare_controller(&mut self, canvas_rect: Rect, pixels_per_point: f32) -> bool {
        let Some(controller) = self.controller.as_mut() else {
            return false;
        };
        controller.host_mut().update_frame(canvas_rect, pixels_per_point);

        if !controller.is_initialized() {
            if !canvas_rect.is_positive() {
                log::trace!("Canvas has no area yet, deferring init");
                return false;
            }
            controller.init();
            controller.set_tool(self.tool);
            controller.set_style(StyleUpdate {
                stroke_color: Some(self.stroke_color),
                line_width: Some(self.line_width),
            });
            self.input.reset(canvas_rect);
        }
        true
    }
}

fn paint_layer(
    textures: &mut TextureManager,
    slot: LayerSlot,
    surface: &Surface,
    placement: Rect,
    ctx: &egui::Context,
    painter: &egui::Painter,
) {
    if surface.width() == 0 || surface.height() == 0 {
        return;
    }
    let texture = textures.texture_for(slot, surface, ctx);
    let rect = Rect::from_min_size(placement.min, surface.logical_size());
    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    painter.image(texture, rect, uv, Color32::WHITE);
}

impl eframe::App for SketchpadApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(controller) = &mut self.controller {
            controller.dispose();
        }
        self.textures.release(LayerSlot::Overlay);
    }
}
