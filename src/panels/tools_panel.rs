use crate::SketchpadApp;
use crate::components::ToolButton;
use crate::tool::PaintTool;
use egui;

pub fn tools_panel(app: &mut SketchpadApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            ui.horizontal(|ui| {
                for tool in PaintTool::ALL {
                    let selected = app.tool() == tool;
                    if ToolButton::new(tool, selected).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.label());
                        app.select_tool(tool);
                    }
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = app.stroke_color();
                let changed = egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed();
                if changed {
                    app.set_stroke_color(color);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Thickness:");
                let mut width = app.line_width();
                if ui.add(egui::Slider::new(&mut width, 1.0..=50.0)).changed() {
                    app.set_line_width(width);
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    app.reset();
                }
                if ui.button("Export").clicked() {
                    app.export();
                }
            });
        });
}
