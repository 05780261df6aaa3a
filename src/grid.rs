use egui::{Color32, pos2};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Pitch and color of the background grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    pub pitch: f32,
    pub color: Color32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            pitch: 10.0,
            color: Color32::from_gray(0xcc),
        }
    }
}

/// Clears `surface` and strokes the grid across its full extent.
///
/// Every line is stroked as its own path. The line width is half the device
/// pixel ratio, and the surface's paint state is restored afterwards.
pub fn draw_grid(surface: &mut Surface, style: &GridStyle, pixels_per_point: f32) {
    surface.save();
    surface.clear();

    if !(style.pitch.is_finite() && style.pitch > 0.0) {
        log::warn!("Skipping grid with invalid pitch {}", style.pitch);
        surface.restore();
        return;
    }

    surface.set_line_width(pixels_per_point / 2.0);
    surface.set_stroke_color(style.color);

    let extent = surface.logical_size();

    let mut column = 0;
    loop {
        let x = column as f32 * style.pitch;
        if x > extent.x {
            break;
        }
        surface.begin_path();
        surface.move_to(pos2(x, 0.0));
        surface.line_to(pos2(x, extent.y));
        surface.stroke();
        column += 1;
    }

    let mut row = 0;
    loop {
        let y = row as f32 * style.pitch;
        if y > extent.y {
            break;
        }
        surface.begin_path();
        surface.move_to(pos2(0.0, y));
        surface.line_to(pos2(extent.x, y));
        surface.stroke();
        row += 1;
    }

    surface.begin_path();
    surface.restore();
}
