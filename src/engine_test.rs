#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::element::Shape;
use crate::render::recording_surface::{Op, Recorder};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn core_with(tool: Tool) -> EngineCore {
    let mut core = EngineCore::new();
    core.set_tool(tool);
    core
}

/// Press, drag through `path`, release.
fn drag(core: &mut EngineCore, from: Point, path: &[Point]) {
    core.on_pointer_down(from, Button::Primary);
    for p in path {
        core.on_pointer_move(*p).unwrap();
    }
    core.on_pointer_up().unwrap();
}

fn hook_counter(core: &mut EngineCore) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    core.redraw.set_hook(move || seen.set(seen.get() + 1));
    count
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn brush_drag_commits_stroke_with_every_point() {
    let mut core = core_with(Tool::Brush);
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0), pt(2.0, 2.0)]);

    assert_eq!(core.scene.len(), 1);
    assert!(core.scene.live_element().is_none());
    assert!(core.gesture.is_idle());
    match &core.scene.elements()[0].shape {
        Shape::Stroke { points, .. } => assert_eq!(points.len(), 3),
        other => panic!("expected stroke, got {other:?}"),
    }
    assert_eq!(core.scene.undo_depth(), 1);
}

#[test]
fn live_element_exists_only_during_drawing() {
    let mut core = core_with(Tool::Line);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert!(matches!(core.gesture, Gesture::Drawing { .. }));
    assert!(core.scene.live_element().is_some());
    assert!(core.scene.is_empty());

    core.on_pointer_move(pt(30.0, 40.0)).unwrap();
    core.on_pointer_up().unwrap();
    assert!(core.scene.live_element().is_none());
    assert_eq!(core.scene.elements()[0].shape, Shape::Line { end: pt(30.0, 40.0) });
}

#[test]
fn click_without_drag_commits_degenerate_shapes() {
    for (tool, expected) in [
        (Tool::Rectangle, Shape::Rectangle { width: 0.0, height: 0.0 }),
        (Tool::Line, Shape::Line { end: pt(40.0, 30.0) }),
        (Tool::Circle, Shape::Circle { edge: pt(40.0, 30.0) }),
    ] {
        let mut core = core_with(tool);
        drag(&mut core, pt(40.0, 30.0), &[]);

        assert_eq!(core.scene.len(), 1, "{tool:?}");
        let el = &core.scene.elements()[0];
        assert_eq!(el.origin, pt(40.0, 30.0));
        assert_eq!(el.shape, expected);
        assert_eq!(core.scene.undo_depth(), 1);
    }
}

#[test]
fn pointer_positions_are_converted_to_world() {
    let mut core = core_with(Tool::Rectangle);
    core.viewport.scale = 2.0;
    core.viewport.pan_x = 100.0;
    drag(&mut core, pt(100.0, 0.0), &[pt(140.0, 20.0)]);

    let el = &core.scene.elements()[0];
    assert_eq!(el.origin, pt(0.0, 0.0));
    assert_eq!(el.shape, Shape::Rectangle { width: 20.0, height: 10.0 });
}

#[test]
fn second_pointer_down_mid_gesture_is_ignored() {
    let mut core = core_with(Tool::Brush);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    let live_id = core.scene.live_element().map(|el| el.id);

    let actions = core.on_pointer_down(pt(50.0, 50.0), Button::Middle);
    assert!(actions.is_empty());
    assert!(matches!(core.gesture, Gesture::Drawing { .. }));
    assert_eq!(core.scene.live_element().map(|el| el.id), live_id);
}

#[test]
fn secondary_button_does_nothing() {
    let mut core = core_with(Tool::Brush);
    let actions = core.on_pointer_down(pt(0.0, 0.0), Button::Secondary);
    assert!(actions.is_empty());
    assert!(core.gesture.is_idle());
    assert!(core.scene.live_element().is_none());
}

#[test]
fn pointer_up_without_gesture_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_up().unwrap().is_empty());
    assert!(core.scene.is_empty());
    assert_eq!(core.scene.undo_depth(), 0);
}

// =============================================================
// Style resolution
// =============================================================

#[test]
fn background_colored_ink_falls_back_to_default() {
    let mut core = core_with(Tool::Brush);
    core.set_color("#FFFFFF");
    drag(&mut core, pt(0.0, 0.0), &[pt(5.0, 5.0)]);
    assert_eq!(core.scene.elements()[0].style.color, core.config.default_ink);
}

#[test]
fn eraser_keeps_background_color() {
    let mut core = core_with(Tool::Eraser);
    core.set_color("#ffffff");
    assert_eq!(core.style_for(ElementKind::Eraser).color, "#ffffff");
}

#[test]
fn highlighter_is_translucent() {
    let core = EngineCore::new();
    assert_eq!(core.style_for(ElementKind::Highlighter).alpha, core.config.highlighter_alpha);
    assert_eq!(core.style_for(ElementKind::Brush).alpha, 1.0);
}

#[test]
fn invalid_size_is_ignored() {
    let mut core = EngineCore::new();
    core.set_size(12.0);
    core.set_size(0.0);
    core.set_size(f64::NAN);
    assert_eq!(core.ui.size, 12.0);
}

// =============================================================
// Panning and zoom
// =============================================================

#[test]
fn middle_button_pans_with_any_tool() {
    let mut core = core_with(Tool::Brush);
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Middle);
    assert_eq!(actions, vec![Action::SetCursor("grabbing".into())]);

    core.on_pointer_move(pt(25.0, 5.0)).unwrap();
    core.on_pointer_move(pt(30.0, 0.0)).unwrap();
    assert_eq!((core.viewport.pan_x, core.viewport.pan_y), (20.0, -10.0));

    let actions = core.on_pointer_up().unwrap();
    assert_eq!(actions, vec![Action::SetCursor("crosshair".into())]);
    assert!(core.scene.is_empty());
}

#[test]
fn pan_tool_pans_with_primary_button() {
    let mut core = core_with(Tool::Pan);
    drag(&mut core, pt(0.0, 0.0), &[pt(-8.0, 4.0)]);
    assert_eq!((core.viewport.pan_x, core.viewport.pan_y), (-8.0, 4.0));
    assert_eq!(core.scene.undo_depth(), 0);
}

#[test]
fn wheel_up_zooms_in_around_cursor() {
    let mut core = EngineCore::new();
    let cursor = pt(200.0, 100.0);
    let anchor = core.viewport.screen_to_world(cursor);

    core.on_wheel(cursor, WheelDelta { dx: 0.0, dy: -1.0 });
    assert!(core.viewport.scale > 1.0);
    let after = core.viewport.screen_to_world(cursor);
    assert!((after.x - anchor.x).abs() < 1e-9);
    assert!((after.y - anchor.y).abs() < 1e-9);

    core.on_wheel(cursor, WheelDelta { dx: 0.0, dy: 1.0 });
    assert!((core.viewport.scale - 1.0).abs() < 1e-9);
}

#[test]
fn horizontal_scroll_does_not_zoom() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 30.0, dy: 0.0 });
    assert_eq!(core.viewport.scale, 1.0);
}

#[test]
fn reset_view_restores_identity() {
    let mut core = EngineCore::new();
    core.viewport.pan(40.0, 40.0);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 });
    assert!(core.reset_view());
    assert_eq!(core.viewport.scale, 1.0);
    assert_eq!((core.viewport.pan_x, core.viewport.pan_y), (0.0, 0.0));
}

// =============================================================
// Moving elements
// =============================================================

#[test]
fn move_tool_drags_topmost_element_with_one_checkpoint() {
    let mut core = core_with(Tool::Line);
    drag(&mut core, pt(0.0, 0.0), &[pt(100.0, 0.0)]);
    let id = core.scene.elements()[0].id;
    assert_eq!(core.scene.undo_depth(), 1);

    core.set_tool(Tool::Move);
    let actions = core.on_pointer_down(pt(50.0, 2.0), Button::Primary);
    assert_eq!(actions, vec![Action::SetCursor("move".into())]);
    core.on_pointer_move(pt(60.0, 2.0)).unwrap();
    core.on_pointer_move(pt(70.0, 12.0)).unwrap();
    core.on_pointer_up().unwrap();

    let moved = core.scene.get(id).unwrap();
    assert_eq!(moved.origin, pt(20.0, 10.0));
    assert_eq!(moved.shape, Shape::Line { end: pt(120.0, 10.0) });
    assert_eq!(core.scene.undo_depth(), 2);

    assert!(core.undo().unwrap());
    assert_eq!(core.scene.get(id).unwrap().origin, pt(0.0, 0.0));
}

#[test]
fn click_without_movement_records_nothing() {
    let mut core = core_with(Tool::Line);
    drag(&mut core, pt(0.0, 0.0), &[pt(100.0, 0.0)]);
    core.set_tool(Tool::Move);

    core.on_pointer_down(pt(50.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(50.0, 0.0)).unwrap();
    core.on_pointer_up().unwrap();
    assert_eq!(core.scene.undo_depth(), 1);
}

#[test]
fn move_tool_on_empty_space_starts_nothing() {
    let mut core = core_with(Tool::Move);
    assert!(core.on_pointer_down(pt(500.0, 500.0), Button::Primary).is_empty());
    assert!(core.gesture.is_idle());
}

#[test]
fn element_at_uses_screen_coordinates() {
    let mut core = core_with(Tool::Line);
    drag(&mut core, pt(0.0, 0.0), &[pt(100.0, 0.0)]);
    let id = core.scene.elements()[0].id;

    core.viewport.pan(0.0, 300.0);
    assert_eq!(core.element_at(pt(50.0, 300.0)), Some(id));
    assert_eq!(core.element_at(pt(50.0, 0.0)), None);
}

// =============================================================
// Text placement
// =============================================================

#[test]
fn text_tool_requests_editor_instead_of_drawing() {
    let mut core = core_with(Tool::Sticky);
    core.viewport.pan(10.0, 10.0);
    let actions = core.on_pointer_down(pt(60.0, 30.0), Button::Primary);
    assert_eq!(
        actions,
        vec![Action::EditTextRequested { kind: ElementKind::StickyNote, world: pt(50.0, 20.0), screen: pt(60.0, 30.0) }]
    );
    assert!(core.gesture.is_idle());
    assert!(core.scene.live_element().is_none());
}

#[test]
fn place_text_commits_content() {
    let mut core = EngineCore::new();
    let id = core.place_text(ElementKind::Text, pt(5.0, 5.0), "hello").unwrap().unwrap();
    let el = core.scene.get(id).unwrap();
    assert_eq!(el.content(), Some("hello"));
    assert_eq!(el.origin, pt(5.0, 5.0));
    assert_eq!(core.scene.undo_depth(), 1);
}

#[test]
fn blank_text_is_discarded() {
    let mut core = EngineCore::new();
    assert_eq!(core.place_text(ElementKind::Text, pt(0.0, 0.0), "  \n ").unwrap(), None);
    assert!(core.scene.is_empty());
    assert_eq!(core.scene.undo_depth(), 0);
}

#[test]
fn place_text_rejects_non_text_kinds() {
    let mut core = EngineCore::new();
    assert_eq!(core.place_text(ElementKind::Circle, pt(0.0, 0.0), "x").unwrap(), None);
    assert!(core.scene.is_empty());
}

// =============================================================
// History and persistence
// =============================================================

#[test]
fn undo_redo_refused_mid_gesture() {
    let mut core = core_with(Tool::Brush);
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary);

    assert!(!core.undo().unwrap());
    assert!(!core.clear().unwrap());
    assert_eq!(core.scene.len(), 1);

    core.on_pointer_up().unwrap();
    assert!(core.undo().unwrap());
    assert_eq!(core.scene.len(), 1);
    assert!(core.redo().unwrap());
    assert_eq!(core.scene.len(), 2);
}

#[test]
fn clear_is_undoable() {
    let mut core = core_with(Tool::Brush);
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    assert!(core.clear().unwrap());
    assert!(core.scene.is_empty());
    assert!(core.undo().unwrap());
    assert_eq!(core.scene.len(), 1);
}

#[test]
fn load_replaces_scene_and_history() {
    let mut core = core_with(Tool::Brush);
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    let saved = core.save_json().unwrap();
    drag(&mut core, pt(9.0, 9.0), &[pt(10.0, 10.0)]);

    assert!(core.load_json(&saved).unwrap());
    assert_eq!(core.scene.len(), 1);
    assert_eq!(core.scene.undo_depth(), 0);
    assert_eq!(core.scene.redo_depth(), 0);
}

#[test]
fn load_and_reset_view_refused_mid_gesture() {
    let mut core = core_with(Tool::Brush);
    let saved = core.save_json().unwrap();
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    core.viewport.pan(10.0, 0.0);

    core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    assert!(!core.load_json(&saved).unwrap());
    assert!(!core.reset_view());
    assert_eq!(core.scene.len(), 1);
    assert!(core.scene.live_element().is_some());
    assert_eq!(core.viewport.pan_x, 10.0);
}

#[test]
fn malformed_load_changes_nothing() {
    let mut core = core_with(Tool::Brush);
    drag(&mut core, pt(0.0, 0.0), &[pt(1.0, 1.0)]);
    assert!(core.load_json("{not json").is_err());
    assert_eq!(core.scene.len(), 1);
    assert_eq!(core.scene.undo_depth(), 1);
}

#[test]
fn history_limit_comes_from_config() {
    let config = EngineConfig { history_limit: 2, ..EngineConfig::default() };
    let mut core = EngineCore::with_config(config);
    core.set_tool(Tool::Brush);
    for i in 0..5 {
        let x = f64::from(i) * 10.0;
        drag(&mut core, pt(x, 0.0), &[pt(x + 1.0, 1.0)]);
    }
    assert_eq!(core.scene.undo_depth(), 2);
}

// =============================================================
// Redraw coalescing
// =============================================================

#[test]
fn redraw_requests_coalesce_until_frame_rendered() {
    let mut core = core_with(Tool::Brush);
    let fired = hook_counter(&mut core);

    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    for i in 1..=10 {
        core.on_pointer_move(pt(f64::from(i), 0.0)).unwrap();
    }
    assert_eq!(fired.get(), 1);
    assert!(core.redraw.is_pending());

    core.render_to(&Recorder::new()).unwrap();
    assert!(!core.redraw.is_pending());

    core.on_pointer_move(pt(20.0, 0.0)).unwrap();
    assert_eq!(fired.get(), 2);
}

#[test]
fn idle_pointer_motion_requests_no_redraw() {
    let mut core = EngineCore::new();
    let fired = hook_counter(&mut core);
    core.on_pointer_move(pt(5.0, 5.0)).unwrap();
    assert_eq!(fired.get(), 0);
}

#[test]
fn render_draws_live_element() {
    let mut core = core_with(Tool::Line);
    core.config.show_grid = false;
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(10.0, 0.0)).unwrap();

    let surface = Recorder::new();
    core.render_to(&surface).unwrap();
    assert!(surface.ops().contains(&Op::LineTo(10.0, 0.0)));
}
