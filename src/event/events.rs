use egui::Pos2;

/// Where a listener is attached in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The main drawing surface
    Surface,
    /// The window hosting the widget
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Resize,
}

impl EventKind {
    pub fn target(self) -> EventTarget {
        match self {
            Self::Resize => EventTarget::Window,
            Self::PointerDown | Self::PointerMove | Self::PointerUp | Self::PointerCancel => {
                EventTarget::Surface
            }
        }
    }
}

/// Events the host delivers to the drawing controller.
///
/// Pointer positions are relative to the main surface's top-left corner, in
/// logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    PointerDown { pos: Pos2 },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2 },
    /// The pointer was released somewhere the surface does not see
    PointerCancel,
    /// The window changed size, so the surface's on-screen box may have moved
    Resize,
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::PointerCancel => EventKind::PointerCancel,
            Self::Resize => EventKind::Resize,
        }
    }
}
