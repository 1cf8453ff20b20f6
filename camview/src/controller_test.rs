#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// A controller that has seen one 640x480 frame shown at 1:1.
fn ready_controller() -> PanZoomController {
    let mut c = PanZoomController::default();
    c.set_display_size(Resolution::new(640, 480));
    c.set_device_resolution(Resolution::new(640, 480));
    c.observe_frame(Resolution::new(640, 480), 1.0);
    c
}

fn drag(c: &mut PanZoomController, path: &[(f64, f64)]) -> Vec<Action> {
    let mut actions = Vec::new();
    let (x0, y0) = path[0];
    actions.extend(c.handle(GestureEvent::DragStart { x: x0, y: y0 }));
    for &(x, y) in &path[1..] {
        actions.extend(c.handle(GestureEvent::DragMove { x, y }));
    }
    let (xn, yn) = path[path.len() - 1];
    actions.extend(c.handle(GestureEvent::DragEnd { x: xn, y: yn }));
    actions
}

fn clicks(actions: &[Action]) -> usize {
    actions.iter().filter(|a| matches!(a, Action::AnchorSet(_))).count()
}

// =============================================================
// Dispatch table
// =============================================================

#[test]
fn dispatch_table_maps_every_event() {
    assert_eq!(
        command_for(GestureEvent::Wheel { direction: WheelDirection::Up, x: 1.0, y: 2.0 }),
        Command::ZoomIn(Point::new(1.0, 2.0))
    );
    assert_eq!(
        command_for(GestureEvent::Wheel { direction: WheelDirection::Down, x: 1.0, y: 2.0 }),
        Command::ZoomOut(Point::new(1.0, 2.0))
    );
    assert_eq!(command_for(GestureEvent::DragStart { x: 0.0, y: 0.0 }), Command::BeginDrag(Point::new(0.0, 0.0)));
    assert_eq!(command_for(GestureEvent::DragMove { x: 0.0, y: 0.0 }), Command::DragTo(Point::new(0.0, 0.0)));
    assert_eq!(command_for(GestureEvent::DragEnd { x: 0.0, y: 0.0 }), Command::EndDrag(Point::new(0.0, 0.0)));
    assert_eq!(command_for(GestureEvent::Click { x: 5.0, y: 6.0 }), Command::Click(Point::new(5.0, 6.0)));
    assert_eq!(command_for(GestureEvent::DoubleClick { x: 5.0, y: 6.0 }), Command::ToggleFullScreen);
    assert_eq!(command_for(GestureEvent::MiddleClick), Command::Reset);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_up_zooms_in_at_cursor() {
    let mut c = ready_controller();
    let actions = c.handle(GestureEvent::Wheel { direction: WheelDirection::Up, x: 320.0, y: 240.0 });
    assert_eq!(actions.len(), 1);
    assert!(approx_eq(c.viewport().zoom_factor, 1.2));
    assert!(c.viewport().offset_x > 0.0);
}

#[test]
fn wheel_down_at_zoom_one_changes_nothing() {
    let mut c = ready_controller();
    let actions = c.handle(GestureEvent::Wheel { direction: WheelDirection::Down, x: 320.0, y: 240.0 });
    assert!(actions.is_empty());
    assert_eq!(c.viewport().zoom_factor, 1.0);
}

#[test]
fn wheel_before_first_frame_is_skipped() {
    let mut c = PanZoomController::default();
    let actions = c.handle(GestureEvent::Wheel { direction: WheelDirection::Up, x: 10.0, y: 10.0 });
    assert!(actions.is_empty());
    assert_eq!(c.viewport(), ViewportState::default());
}

#[test]
fn custom_zoom_scale_is_used() {
    let mut c = ready_controller();
    c.zoom_scale = 2.0;
    c.handle(GestureEvent::Wheel { direction: WheelDirection::Up, x: 0.0, y: 0.0 });
    assert_eq!(c.viewport().zoom_factor, 2.0);
}

// =============================================================
// Drag / click classification
// =============================================================

#[test]
fn short_drag_fires_click() {
    let mut c = ready_controller();
    let actions = drag(&mut c, &[(100.0, 100.0), (103.0, 102.0), (104.0, 104.0)]);
    assert_eq!(clicks(&actions), 1);
    assert!(c.anchor().is_some());
}

#[test]
fn long_drag_fires_no_click() {
    let mut c = ready_controller();
    let actions = drag(&mut c, &[(100.0, 100.0), (105.0, 105.0)]);
    assert_eq!(clicks(&actions), 0);
    assert_eq!(c.anchor(), None);
}

#[test]
fn press_release_without_motion_is_click() {
    let mut c = ready_controller();
    let actions = drag(&mut c, &[(320.0, 240.0)]);
    assert_eq!(clicks(&actions), 1);
    let anchor = c.anchor().unwrap();
    assert!(approx_eq(anchor.fx, 0.5));
    assert!(approx_eq(anchor.fy, 0.5));
}

#[test]
fn drag_pans_with_delta_since_last_move() {
    let mut c = ready_controller();
    c.replace_viewport(ViewportState { zoom_factor: 2.0, offset_x: 100.0, offset_y: 100.0, ..c.viewport() });
    c.sticky = false;
    c.handle(GestureEvent::DragStart { x: 50.0, y: 50.0 });
    c.handle(GestureEvent::DragMove { x: 60.0, y: 50.0 });
    assert!(approx_eq(c.viewport().offset_x, 90.0));
    c.handle(GestureEvent::DragMove { x: 70.0, y: 50.0 });
    assert!(approx_eq(c.viewport().offset_x, 80.0));
}

#[test]
fn short_drag_still_pans() {
    let mut c = ready_controller();
    c.replace_viewport(ViewportState { zoom_factor: 2.0, offset_x: 100.0, offset_y: 100.0, ..c.viewport() });
    c.sticky = false;
    let actions = drag(&mut c, &[(50.0, 50.0), (54.0, 50.0)]);
    assert_eq!(clicks(&actions), 1);
    assert!(approx_eq(c.viewport().offset_x, 96.0));
}

#[test]
fn sticky_drag_tracks_pointer_at_zoom() {
    let mut c = ready_controller();
    c.replace_viewport(ViewportState { zoom_factor: 2.0, offset_x: 100.0, offset_y: 100.0, ..c.viewport() });
    drag(&mut c, &[(50.0, 50.0), (70.0, 50.0)]);
    assert!(approx_eq(c.viewport().offset_x, 90.0));
}

#[test]
fn move_without_press_is_ignored() {
    let mut c = ready_controller();
    c.replace_viewport(ViewportState { zoom_factor: 2.0, offset_x: 100.0, offset_y: 100.0, ..c.viewport() });
    let before = c.viewport();
    assert!(c.handle(GestureEvent::DragMove { x: 500.0, y: 500.0 }).is_empty());
    assert!(c.handle(GestureEvent::DragEnd { x: 500.0, y: 500.0 }).is_empty());
    assert_eq!(c.viewport(), before);
}

#[test]
fn abort_gesture_drops_tracker() {
    let mut c = ready_controller();
    c.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
    assert!(c.is_dragging());
    c.abort_gesture();
    assert!(!c.is_dragging());
    assert!(c.handle(GestureEvent::DragEnd { x: 0.0, y: 0.0 }).is_empty());
}

#[test]
fn direct_click_maps_through_zoom_and_offset() {
    let mut c = ready_controller();
    c.replace_viewport(ViewportState { zoom_factor: 2.0, offset_x: 320.0, offset_y: 240.0, ..c.viewport() });
    c.handle(GestureEvent::Click { x: 0.0, y: 0.0 });
    let anchor = c.anchor().unwrap();
    assert!(approx_eq(anchor.fx, 0.5));
    assert!(approx_eq(anchor.fy, 0.5));
}

#[test]
fn click_without_display_size_is_skipped() {
    let mut c = PanZoomController::default();
    c.observe_frame(Resolution::new(640, 480), 1.0);
    assert!(c.handle(GestureEvent::Click { x: 1.0, y: 1.0 }).is_empty());
    assert_eq!(c.anchor(), None);
}

// =============================================================
// Double-click / middle-click
// =============================================================

#[test]
fn double_click_toggles_full_screen_only() {
    let mut c = ready_controller();
    let before = c.viewport();
    assert_eq!(c.handle(GestureEvent::DoubleClick { x: 1.0, y: 1.0 }), vec![Action::FullScreenToggled(true)]);
    assert_eq!(c.handle(GestureEvent::DoubleClick { x: 1.0, y: 1.0 }), vec![Action::FullScreenToggled(false)]);
    assert_eq!(c.viewport(), before);
    assert_eq!(c.anchor(), None);
}

#[test]
fn middle_click_resets() {
    let mut c = ready_controller();
    c.handle(GestureEvent::Wheel { direction: WheelDirection::Up, x: 600.0, y: 400.0 });
    c.handle(GestureEvent::Wheel { direction: WheelDirection::Up, x: 600.0, y: 400.0 });
    c.handle(GestureEvent::MiddleClick);
    let v = c.viewport();
    assert_eq!(v.zoom_factor, 1.0);
    assert_eq!((v.offset_x, v.offset_y), (0.0, 0.0));
}

// =============================================================
// Zoom button
// =============================================================

#[test]
fn zoom_button_thirds() {
    let mut c = ready_controller();
    c.zoom_button(0.9);
    assert!(approx_eq(c.viewport().zoom_factor, 1.2));
    c.zoom_button(0.9);
    assert!(approx_eq(c.viewport().zoom_factor, 1.44));
    c.zoom_button(0.1);
    assert!(approx_eq(c.viewport().zoom_factor, 1.2));
    c.zoom_button(0.5);
    assert_eq!(c.viewport().zoom_factor, 1.0);
}

#[test]
fn center_zoom_keeps_frame_centre_visible() {
    let mut c = ready_controller();
    c.zoom_in_center();
    let v = c.viewport();
    let rect = viewport::compute_crop_rect(&v).unwrap();
    assert!(rect.x0 < 320.0 && rect.x0 + rect.w > 320.0);
    assert!(rect.y0 < 240.0 && rect.y0 + rect.h > 240.0);
}

// =============================================================
// Frame observation
// =============================================================

#[test]
fn observe_frame_updates_metrics() {
    let mut c = PanZoomController::default();
    c.observe_frame(Resolution::new(320, 240), 2.5);
    assert_eq!(c.viewport().frame_dims, Resolution::new(320, 240));
    assert_eq!(c.viewport().fit_scale, 2.5);
}
