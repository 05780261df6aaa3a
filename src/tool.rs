use egui::CursorIcon;
use serde::{Deserialize, Serialize};

/// The active drawing mode of the sketchpad.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintTool {
    /// Freehand strokes on the main surface
    #[default]
    Brush,
    /// Fixed-size rectangular clears on the main surface
    Eraser,
}

impl PaintTool {
    pub const ALL: [PaintTool; 2] = [PaintTool::Brush, PaintTool::Eraser];

    pub fn label(self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Brush => "🖌",
            Self::Eraser => "⌫",
        }
    }

    /// Cursor shown while the pointer is held down with this tool.
    pub fn active_cursor(self) -> CursorIcon {
        match self {
            Self::Brush => CursorIcon::PointingHand,
            Self::Eraser => CursorIcon::Crosshair,
        }
    }
}
