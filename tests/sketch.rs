// Stroke capture contract: begin/extend/end ordering, live rendering,
// pointer normalization and submission. Native-friendly, no browser APIs.

use quickdraw::sketch::{
    DEFAULT_BRUSH_WIDTH, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH, Point, PointerEvent, SketchPad,
};
use quickdraw::surface::{CanvasSize, CanvasType, Rgb};

fn pad() -> SketchPad {
    SketchPad::new(CanvasSize::Small, CanvasType::Whiteboard)
}

#[test]
fn extend_without_begin_is_a_noop() {
    let mut pad = pad();
    pad.extend_stroke(Point { x: 150.0, y: 150.0 });
    assert!(!pad.stroke_open());
    assert_eq!(pad.surface().pixel(150, 150), Rgb::WHITE, "no stroke should have rendered");
}

#[test]
fn end_without_open_stroke_is_idempotent() {
    let mut pad = pad();
    pad.end_stroke();
    pad.end_stroke();
    assert_eq!(pad.stroke_count(), 0);
}

#[test]
fn begin_renders_the_first_dab_immediately() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 150.0, y: 150.0 });
    assert!(pad.stroke_open());
    assert_eq!(pad.surface().pixel(150, 150), Rgb::BLACK);
}

#[test]
fn extend_renders_incrementally_before_the_stroke_ends() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 150.0 });
    pad.extend_stroke(Point { x: 100.0, y: 150.0 });
    // Mid-segment pixels are committed while the stroke is still open.
    assert!(pad.stroke_open());
    assert_eq!(pad.surface().pixel(55, 150), Rgb::BLACK);
}

#[test]
fn one_gesture_becomes_one_stroke() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 10.0 });
    pad.extend_stroke(Point { x: 20.0, y: 20.0 });
    pad.extend_stroke(Point { x: 30.0, y: 25.0 });
    pad.end_stroke();
    assert_eq!(pad.stroke_count(), 1);
    assert!(!pad.stroke_open());
}

#[test]
fn begin_while_open_closes_the_previous_gesture() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 10.0 });
    pad.begin_stroke(Point { x: 50.0, y: 50.0 });
    pad.end_stroke();
    assert_eq!(pad.stroke_count(), 2, "a dropped pointer-up must not merge gestures");
}

#[test]
fn brush_width_clamps_into_range() {
    let mut pad = pad();
    assert_eq!(pad.brush().width, DEFAULT_BRUSH_WIDTH);
    pad.set_width(0);
    assert_eq!(pad.brush().width, MIN_BRUSH_WIDTH);
    pad.set_width(99);
    assert_eq!(pad.brush().width, MAX_BRUSH_WIDTH);
    pad.set_width(12);
    assert_eq!(pad.brush().width, 12);
}

#[test]
fn brush_color_applies_to_strokes_opened_after_the_change() {
    let mut pad = pad();
    let red = Rgb::from_hex("#ff0000").expect("hex");
    pad.set_color(red);
    pad.begin_stroke(Point { x: 40.0, y: 40.0 });
    pad.end_stroke();
    assert_eq!(pad.surface().pixel(40, 40), red);
}

#[test]
fn mouse_and_touch_normalize_to_the_same_surface_point() {
    let mouse = PointerEvent::mouse(120.0, 80.0).to_surface(20.0, 30.0);
    let touch = PointerEvent::touch(120.0, 80.0).to_surface(20.0, 30.0);
    assert_eq!(mouse, Point { x: 100.0, y: 50.0 });
    assert_eq!(mouse, touch, "capture logic must be source-agnostic");
}

#[test]
fn submitting_with_zero_strokes_is_legal() {
    let mut pad = pad();
    let url = pad.submit().expect("background-only submit");
    assert!(url.starts_with("data:image/png;base64,"));
}

#[test]
fn submit_discards_the_stroke_set() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 10.0 });
    pad.extend_stroke(Point { x: 60.0, y: 60.0 });
    pad.submit().expect("submit");
    assert_eq!(pad.stroke_count(), 0);
    assert!(!pad.stroke_open());
}

#[test]
fn submit_is_bit_exact_while_the_surface_is_unchanged() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 10.0 });
    pad.extend_stroke(Point { x: 60.0, y: 60.0 });
    let first = pad.submit().expect("first");
    let second = pad.submit().expect("second");
    assert_eq!(first, second);
}

#[test]
fn reset_drops_previous_prompt_content() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 150.0, y: 150.0 });
    pad.end_stroke();
    pad.reset(CanvasType::Whiteboard);
    assert_eq!(pad.stroke_count(), 0);
    assert_eq!(pad.surface().pixel(150, 150), Rgb::WHITE);
}

#[test]
fn reset_applies_the_new_canvas_type() {
    let mut pad = pad();
    pad.reset(CanvasType::Blackboard);
    assert_eq!(pad.surface().pixel(0, 0), Rgb::BLACK);
    assert_eq!(pad.surface().pixel(299, 299), Rgb::BLACK);
}

#[test]
fn resize_rebuilds_the_surface() {
    let mut pad = pad();
    pad.begin_stroke(Point { x: 10.0, y: 10.0 });
    pad.resize(CanvasSize::Large, CanvasType::Whiteboard);
    assert_eq!(pad.surface().size(), 700);
    assert!(!pad.stroke_open(), "resize must not keep a stroke from the old surface");
    assert_eq!(pad.surface().pixel(10, 10), Rgb::WHITE);
}
