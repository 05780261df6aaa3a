mod common;

use common::*;
use eframe_sketchpad::{EventTarget, PaintTool, StyleUpdate, SurfaceEvent};
use egui::{Color32, Rect, pos2, vec2};

const GRID: Color32 = Color32::from_gray(0xcc);

fn exercise_everything(controller: &mut TestController) {
    controller.set_style(StyleUpdate {
        stroke_color: Some(Color32::GREEN),
        line_width: Some(12.0),
    });
    controller.set_tool(PaintTool::Brush);
    down(controller, pos2(5.0, 5.0));
    drag(controller, pos2(40.0, 30.0));
    up(controller, pos2(40.0, 30.0));
    controller.set_tool(PaintTool::Eraser);
    down(controller, pos2(5.0, 5.0));
    drag(controller, pos2(20.0, 20.0));
    controller.dispatch(&SurfaceEvent::PointerCancel);
    controller.dispatch(&SurfaceEvent::Resize);
    controller.reset();
    controller.export_image();
}

#[test]
fn test_operations_before_init_are_noops() {
    let mut controller = controller(100.0, 50.0);
    exercise_everything(&mut controller);

    assert!(!controller.is_initialized());
    assert!(!controller.is_drawing());
    assert!(controller.main_surface().is_none());
    assert!(controller.overlay().is_none());
    assert!(controller.host().downloads.is_empty());
    assert!(controller.host().cursor_history.is_empty());
    assert_eq!(controller.host().attach_count, 0);
}

#[test]
fn test_operations_after_dispose_leave_pixels_alone() {
    let mut controller = initialized(100.0, 50.0);
    down(&mut controller, pos2(10.0, 10.0));
    drag(&mut controller, pos2(80.0, 40.0));
    up(&mut controller, pos2(80.0, 40.0));
    let before = main_pixels(&controller);

    controller.dispose();
    exercise_everything(&mut controller);

    assert_eq!(main_pixels(&controller), before);
    assert!(controller.listeners().is_empty());
    assert!(controller.overlay().is_none());
    assert!(controller.host().downloads.is_empty());
    assert_eq!(controller.host().detach_count, 1);
    assert_eq!(controller.host().overlay_placement, None);
}

#[test]
fn test_init_registers_listeners_and_draws_grid() {
    let controller = initialized(100.0, 50.0);

    let listeners = controller.listeners();
    assert_eq!(listeners.count_for(EventTarget::Surface), 4);
    assert_eq!(listeners.count_for(EventTarget::Window), 1);

    let overlay = controller.overlay().unwrap();
    assert_eq!(overlay.placement, controller.host().rect);
    assert_eq!(overlay.surface.pixel(0, 0), Some(GRID));
    assert_eq!(overlay.surface.pixel(55, 25), Some(Color32::TRANSPARENT));
    assert_eq!(overlay.surface.pixel(50, 33), Some(GRID));
    assert!(main_is_blank(&controller));
}

#[test]
fn test_init_twice_keeps_one_overlay() {
    let mut controller = initialized(100.0, 50.0);
    let generation = controller.overlay().unwrap().surface.generation();
    down(&mut controller, pos2(10.0, 10.0));
    drag(&mut controller, pos2(60.0, 10.0));
    up(&mut controller, pos2(60.0, 10.0));
    let strokes = main_pixels(&controller);
    let overlay_generation = controller.overlay().unwrap().surface.generation();
    assert_ne!(generation, overlay_generation);

    controller.init();

    assert_eq!(controller.host().attach_count, 1);
    assert_eq!(controller.listeners().len(), 5);
    assert_eq!(controller.overlay().unwrap().surface.generation(), overlay_generation);
    assert_eq!(main_pixels(&controller), strokes);
}

#[test]
fn test_dispose_without_init_and_twice() {
    let mut controller = controller(100.0, 50.0);
    controller.dispose();
    assert_eq!(controller.host().detach_count, 0);

    controller.init();
    controller.dispose();
    controller.dispose();
    assert_eq!(controller.host().detach_count, 1);
}

#[test]
fn test_reinit_after_dispose_attaches_fresh_overlay() {
    let mut controller = initialized(100.0, 50.0);
    controller.dispose();
    controller.init();

    assert!(controller.is_initialized());
    assert_eq!(controller.host().attach_count, 2);
    assert_eq!(controller.listeners().len(), 5);

    down(&mut controller, pos2(10.0, 10.0));
    assert!(controller.is_drawing());
}

#[test]
fn test_surfaces_scale_with_device_pixel_ratio() {
    let mut controller = controller(100.0, 50.0);
    controller.host_mut().pixels_per_point = 2.0;
    controller.init();

    let main = controller.main_surface().unwrap();
    assert_eq!((main.width(), main.height()), (200, 100));
    assert_eq!(main.logical_size(), vec2(100.0, 50.0));

    let overlay = &controller.overlay().unwrap().surface;
    assert_eq!((overlay.width(), overlay.height()), (200, 100));
    // logical grid line x = 10 lands on device column 20
    assert_eq!(overlay.pixel(20, 7), Some(GRID));

    controller.set_style(StyleUpdate::stroke_color(Color32::RED));
    down(&mut controller, pos2(10.0, 25.0));
    drag(&mut controller, pos2(90.0, 25.0));
    let main = controller.main_surface().unwrap();
    assert_eq!(main.pixel(100, 50), Some(Color32::RED));
}

#[test]
fn test_resize_repositions_overlay_and_redraws_grid() {
    let mut controller = initialized(100.0, 50.0);
    controller.set_tool(PaintTool::Eraser);
    down(&mut controller, pos2(30.0, 25.0));
    drag(&mut controller, pos2(30.0, 25.0));
    assert_eq!(controller.overlay().unwrap().surface.pixel(32, 21), Some(Color32::BLACK));

    let moved = Rect::from_min_size(pos2(120.0, 90.0), vec2(100.0, 50.0));
    controller.host_mut().rect = moved;
    controller.dispatch(&SurfaceEvent::Resize);

    let overlay = controller.overlay().unwrap();
    assert_eq!(overlay.placement.min, moved.min);
    assert_eq!(controller.host().overlay_placement, Some(moved));

    // preview residue is gone and every grid line is present
    assert_eq!(overlay.surface.pixel(32, 21), Some(Color32::TRANSPARENT));
    for x in (0..100).step_by(10) {
        assert_eq!(overlay.surface.pixel(x, 5), Some(GRID), "column {x}");
    }
    for y in (0..50).step_by(10) {
        assert_eq!(overlay.surface.pixel(5, y), Some(GRID), "row {y}");
    }
}

#[test]
fn test_reset_clears_strokes_but_keeps_tool_and_style() {
    let mut controller = initialized(100.0, 50.0);
    controller.set_style(StyleUpdate {
        stroke_color: Some(Color32::RED),
        line_width: Some(6.0),
    });
    down(&mut controller, pos2(10.0, 10.0));
    drag(&mut controller, pos2(60.0, 30.0));
    up(&mut controller, pos2(60.0, 30.0));
    controller.set_tool(PaintTool::Eraser);
    assert!(!main_is_blank(&controller));

    controller.reset();

    assert!(main_is_blank(&controller));
    assert_eq!(controller.active_tool(), PaintTool::Eraser);
    let main = controller.main_surface().unwrap();
    assert_eq!(main.stroke_color(), Color32::RED);
    assert_eq!(main.line_width(), 6.0);
    assert_eq!(controller.overlay().unwrap().surface.pixel(0, 0), Some(GRID));
}

#[test]
fn test_zero_sized_container_is_harmless() {
    let mut controller = controller(0.0, 0.0);
    controller.init();
    exercise_everything(&mut controller);

    assert!(controller.is_initialized());
    assert!(controller.host().downloads.is_empty());
}
