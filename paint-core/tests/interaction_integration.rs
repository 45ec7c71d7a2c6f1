//! Interaction Integration Tests
//!
//! Drives a `PaintState` with serialized input streams the way a host would:
//! - Drawing every tool kind
//! - Select and drag
//! - Touch input and cancellation
//! - Undo, delete and clear

use paint_core::{
    Color, ElementKind, ElementPatch, InputEvent, PaintState, PointerPhase, Shape, Tool,
    TouchEvent, TouchPhase, TouchPoint,
};

/// Feed a JSON array of input events into the state.
fn replay(state: &mut PaintState, json: &str) -> usize {
    let events: Vec<InputEvent> = serde_json::from_str(json).expect("valid event stream");
    events
        .iter()
        .filter(|event| state.handle_event(event))
        .count()
}

/// Press, drag through `path`, release.
fn drag(state: &mut PaintState, path: &[(f32, f32)]) {
    let (first, rest) = path.split_first().expect("non-empty path");
    state.handle_event(&InputEvent::pointer(PointerPhase::Down, first.0, first.1));
    for (x, y) in rest {
        state.handle_event(&InputEvent::pointer(PointerPhase::Move, *x, *y));
    }
    state.handle_event(&InputEvent::pointer(PointerPhase::Up, 0.0, 0.0));
}

fn touch(phase: TouchPhase, points: &[(f32, f32)]) -> InputEvent {
    let touches = points
        .iter()
        .zip(0u32..)
        .map(|(&(x, y), id)| TouchPoint { id, x, y })
        .collect();
    InputEvent::Touch(TouchEvent::new(phase, touches))
}

// ==========================================================================
// Drawing
// ==========================================================================

#[test]
fn test_json_stream_draws_a_stroke() {
    let mut state = PaintState::default();
    let redraws = replay(
        &mut state,
        r#"[
            {"type":"pointer","data":{"phase":"down","x":10.0,"y":10.0}},
            {"type":"pointer","data":{"phase":"move","x":20.0,"y":15.0}},
            {"type":"pointer","data":{"phase":"move","x":30.0,"y":25.0}},
            {"type":"pointer","data":{"phase":"up","x":30.0,"y":25.0}}
        ]"#,
    );
    assert_eq!(redraws, 4);
    assert_eq!(state.scene().len(), 1);

    let stroke = state.scene().last().expect("stroke");
    assert_eq!(stroke.kind(), ElementKind::Freehand);
    assert_eq!(stroke.shape.points().map(<[_]>::len), Some(3));
}

#[test]
fn test_every_drawing_tool_commits_its_kind() {
    let cases = [
        (Tool::Brush, ElementKind::Freehand),
        (Tool::Eraser, ElementKind::Eraser),
        (Tool::Line, ElementKind::Line),
        (Tool::Rectangle, ElementKind::Rectangle),
        (Tool::Circle, ElementKind::Circle),
    ];
    let mut state = PaintState::default();
    for (tool, kind) in cases {
        state.set_tool(tool);
        drag(&mut state, &[(100.0, 100.0), (150.0, 130.0)]);
        assert_eq!(state.scene().last().map(paint_core::Element::kind), Some(kind));
    }
    assert_eq!(state.scene().len(), cases.len());
}

#[test]
fn test_styles_are_captured_at_press_time() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Rectangle);
    state.apply_style(&ElementPatch {
        primary: Some(Color::rgb(255, 0, 0)),
        use_gradient: Some(true),
        ..ElementPatch::default()
    });
    drag(&mut state, &[(0.0, 0.0), (50.0, 50.0)]);

    state.apply_style(&ElementPatch {
        primary: Some(Color::rgb(0, 255, 0)),
        ..ElementPatch::default()
    });

    let rect = state.scene().last().expect("rect");
    assert_eq!(rect.style.primary, Color::rgb(255, 0, 0));
    assert!(rect.fills_with_gradient());
}

// ==========================================================================
// Select and move
// ==========================================================================

#[test]
fn test_select_drag_then_restyle() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Rectangle);
    drag(&mut state, &[(10.0, 10.0), (110.0, 60.0)]);
    let id = state.scene().last().expect("rect").id;

    state.set_tool(Tool::Select);
    drag(&mut state, &[(50.0, 50.0), (60.0, 65.0), (70.0, 80.0)]);
    assert_eq!(state.scene().selected(), Some(id));

    let bounds = state.scene().get(id).expect("rect").bounds();
    assert!((bounds.x - 30.0).abs() < f32::EPSILON);
    assert!((bounds.y - 40.0).abs() < f32::EPSILON);

    state.apply_style(&ElementPatch {
        stroke_width: Some(12.0),
        ..ElementPatch::default()
    });
    assert!((state.scene().get(id).expect("rect").style.stroke_width - 12.0).abs() < f32::EPSILON);
}

#[test]
fn test_text_tool_places_and_selects() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Text);
    state.handle_event(&InputEvent::pointer(PointerPhase::Down, 200.0, 150.0));
    state.handle_event(&InputEvent::pointer(PointerPhase::Up, 200.0, 150.0));

    assert_eq!(state.tool(), Tool::Select);
    let text = state.scene().selected_element().expect("selected text");
    assert!(matches!(&text.shape, Shape::Text { content, .. } if content == "New Text"));

    state.apply_style(&ElementPatch {
        text: Some("Hello".to_string()),
        ..ElementPatch::default()
    });
    let text = state.scene().selected_element().expect("selected text");
    assert!(matches!(&text.shape, Shape::Text { content, .. } if content == "Hello"));
}

#[test]
fn test_click_on_empty_space_clears_selection() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Circle);
    drag(&mut state, &[(300.0, 300.0), (320.0, 300.0)]);
    state.set_tool(Tool::Select);
    drag(&mut state, &[(310.0, 310.0)]);
    assert!(state.scene().selected().is_some());

    drag(&mut state, &[(1200.0, 900.0)]);
    assert!(state.scene().selected().is_none());
}

// ==========================================================================
// Touch
// ==========================================================================

#[test]
fn test_single_finger_touch_draws() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Line);
    state.handle_event(&touch(TouchPhase::Start, &[(10.0, 10.0)]));
    state.handle_event(&touch(TouchPhase::Move, &[(90.0, 40.0)]));
    state.handle_event(&touch(TouchPhase::End, &[]));

    let line = state.scene().last().expect("line");
    assert!(matches!(line.shape, Shape::Line { extent, .. } if (extent.dx - 80.0).abs() < f32::EPSILON));
}

#[test]
fn test_multi_touch_is_ignored() {
    let mut state = PaintState::default();
    assert!(!state.handle_event(&touch(TouchPhase::Start, &[(10.0, 10.0), (50.0, 50.0)])));
    assert!(state.in_progress().is_none());
}

#[test]
fn test_touch_cancel_discards_drawing() {
    let mut state = PaintState::default();
    state.handle_event(&touch(TouchPhase::Start, &[(10.0, 10.0)]));
    state.handle_event(&touch(TouchPhase::Move, &[(20.0, 20.0)]));
    assert!(state.in_progress().is_some());

    state.handle_event(&touch(TouchPhase::Cancel, &[]));
    assert!(state.in_progress().is_none());
    assert!(state.scene().is_empty());
}

// ==========================================================================
// Undo, delete, clear
// ==========================================================================

#[test]
fn test_undo_walks_back_in_insertion_order() {
    let mut state = PaintState::default();
    for tool in [Tool::Line, Tool::Rectangle, Tool::Circle] {
        state.set_tool(tool);
        drag(&mut state, &[(10.0, 10.0), (40.0, 40.0)]);
    }
    let kinds: Vec<_> = std::iter::from_fn(|| state.undo().map(|e| e.kind())).collect();
    assert_eq!(
        kinds,
        vec![ElementKind::Circle, ElementKind::Rectangle, ElementKind::Line]
    );
    assert!(state.undo().is_none());
}

#[test]
fn test_delete_selected_then_clear() {
    let mut state = PaintState::default();
    state.set_tool(Tool::Rectangle);
    drag(&mut state, &[(10.0, 10.0), (60.0, 60.0)]);
    drag(&mut state, &[(200.0, 200.0), (260.0, 260.0)]);

    state.set_tool(Tool::Select);
    drag(&mut state, &[(30.0, 30.0)]);
    assert!(state.delete_selected().is_some());
    assert_eq!(state.scene().len(), 1);
    assert!(state.scene().selected().is_none());

    assert!(!state.clear(|| false));
    assert_eq!(state.scene().len(), 1);
    assert!(state.clear(|| true));
    assert!(state.scene().is_empty());
}
