use crate::SketchpadApp;
use egui;

pub fn central_panel(app: &mut SketchpadApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::WHITE))
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::drag());
            app.paint_canvas(ctx, &painter, &response);
        });
}
