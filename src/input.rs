use egui::{Context, Pos2, Rect};

use crate::event::SurfaceEvent;

/// The slice of egui's pointer state the sketchpad cares about for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    /// Latest pointer position in screen coordinates
    pub pos: Option<Pos2>,
    /// Primary button went down this frame
    pub pressed: bool,
    /// Primary button went up this frame
    pub released: bool,
}

impl PointerSnapshot {
    pub fn from_egui(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            pos: input.pointer.interact_pos().or(input.pointer.latest_pos()),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
        })
    }
}

/// Handles converting raw egui input into the controller's `SurfaceEvent`s
#[derive(Debug, Default)]
pub struct InputHandler {
    canvas_rect: Option<Rect>,
    last_pointer_pos: Option<Pos2>,
    /// The press that started the current gesture landed on the canvas
    captured: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any gesture and adopt `canvas_rect` without reporting a resize.
    pub fn reset(&mut self, canvas_rect: Rect) {
        self.canvas_rect = Some(canvas_rect);
        self.last_pointer_pos = None;
        self.captured = false;
    }

    /// Process raw egui input and generate our SurfaceEvents
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<SurfaceEvent> {
        self.translate(PointerSnapshot::from_egui(ctx), canvas_rect)
    }

    pub fn translate(&mut self, pointer: PointerSnapshot, canvas_rect: Rect) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();

        if self.canvas_rect.is_some_and(|previous| previous != canvas_rect) {
            events.push(SurfaceEvent::Resize);
        }
        self.canvas_rect = Some(canvas_rect);

        let local = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

        if pointer.pressed {
            if let Some(pos) = pointer.pos.filter(|pos| canvas_rect.contains(*pos)) {
                events.push(SurfaceEvent::PointerDown { pos: local(pos) });
                self.captured = true;
                // the press position is where the gesture starts, not a move
                self.last_pointer_pos = Some(pos);
            }
        }

        if let Some(pos) = pointer.pos {
            if Some(pos) != self.last_pointer_pos && canvas_rect.contains(pos) {
                events.push(SurfaceEvent::PointerMove { pos: local(pos) });
            }
            self.last_pointer_pos = Some(pos);
        }

        if pointer.released && self.captured {
            self.captured = false;
            match pointer.pos.filter(|pos| canvas_rect.contains(*pos)) {
                Some(pos) => events.push(SurfaceEvent::PointerUp { pos: local(pos) }),
                None => events.push(SurfaceEvent::PointerCancel),
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0))
    }

    #[test]
    fn test_press_inside_canvas_is_local() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());

        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(110.0, 60.0)), pressed: true, released: false },
            canvas(),
        );

        assert_eq!(events, vec![SurfaceEvent::PointerDown { pos: pos2(10.0, 10.0) }]);
    }

    #[test]
    fn test_press_after_hover_elsewhere_emits_no_move() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());
        let hover = PointerSnapshot { pos: Some(pos2(150.0, 100.0)), ..Default::default() };
        handler.translate(hover, canvas());

        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(160.0, 110.0)), pressed: true, released: false },
            canvas(),
        );
        assert_eq!(events, vec![SurfaceEvent::PointerDown { pos: pos2(60.0, 60.0) }]);

        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(170.0, 110.0)), pressed: false, released: false },
            canvas(),
        );
        assert_eq!(events, vec![SurfaceEvent::PointerMove { pos: pos2(70.0, 60.0) }]);
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());

        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(10.0, 10.0)), pressed: true, released: false },
            canvas(),
        );
        assert!(events.is_empty());

        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(10.0, 10.0)), pressed: false, released: true },
            canvas(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());

        handler.translate(
            PointerSnapshot { pos: Some(pos2(150.0, 100.0)), pressed: true, released: false },
            canvas(),
        );
        let events = handler.translate(
            PointerSnapshot { pos: Some(pos2(500.0, 500.0)), pressed: false, released: true },
            canvas(),
        );

        assert_eq!(events, vec![SurfaceEvent::PointerCancel]);
    }

    #[test]
    fn test_unchanged_position_emits_no_move() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());
        let hover = PointerSnapshot { pos: Some(pos2(150.0, 100.0)), ..Default::default() };

        assert_eq!(handler.translate(hover, canvas()).len(), 1);
        assert!(handler.translate(hover, canvas()).is_empty());
    }

    #[test]
    fn test_changed_canvas_rect_emits_resize() {
        let mut handler = InputHandler::new();
        handler.reset(canvas());

        let moved = canvas().translate(vec2(0.0, 30.0));
        let events = handler.translate(PointerSnapshot::default(), moved);

        assert_eq!(events, vec![SurfaceEvent::Resize]);
        assert!(handler.translate(PointerSnapshot::default(), moved).is_empty());
    }
}
