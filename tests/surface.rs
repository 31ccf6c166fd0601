// Raster surface invariants: deterministic background fills, pixel
// sampling, and the encoded snapshot format. Native-friendly, no browser
// APIs involved.

use quickdraw::surface::{CanvasSize, CanvasType, Rgb, Surface};

#[test]
fn canvas_sizes_are_the_three_allowed() {
    let px: Vec<u32> = CanvasSize::ALL.iter().map(|s| s.px()).collect();
    assert_eq!(px, vec![300, 500, 700]);
}

#[test]
fn whiteboard_background_is_white_everywhere() {
    let surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    for (x, y) in [(0, 0), (150, 150), (299, 0), (0, 299), (299, 299)] {
        assert_eq!(surface.pixel(x, y), Rgb::WHITE, "pixel ({x},{y})");
    }
}

#[test]
fn blackboard_background_is_black_everywhere() {
    let surface = Surface::new(CanvasSize::Small, CanvasType::Blackboard);
    for (x, y) in [(0, 0), (150, 150), (299, 299)] {
        assert_eq!(surface.pixel(x, y), Rgb::BLACK, "pixel ({x},{y})");
    }
}

#[test]
fn reset_swaps_background_completely() {
    let mut surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    surface.stamp_dab(150.0, 150.0, 20, Rgb { r: 200, g: 10, b: 10 });
    surface.reset(CanvasType::Blackboard);
    assert_eq!(surface.pixel(150, 150), Rgb::BLACK, "stale content survived the reset");
    assert_eq!(surface.pixel(0, 0), Rgb::BLACK);
}

#[test]
fn dab_paints_the_center_pixel_even_at_width_one() {
    let mut surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    surface.stamp_dab(10.5, 10.5, 1, Rgb::BLACK);
    assert_eq!(surface.pixel(10, 10), Rgb::BLACK);
}

#[test]
fn segment_paints_along_the_line() {
    let mut surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    surface.stroke_segment(10.0, 150.0, 100.0, 150.0, 5, Rgb::BLACK);
    for x in [10, 40, 70, 100] {
        assert_eq!(surface.pixel(x, 150), Rgb::BLACK, "x={x}");
    }
    // Comfortably off the line stays background.
    assert_eq!(surface.pixel(55, 120), Rgb::WHITE);
}

#[test]
fn dabs_near_the_edge_are_clipped_not_panicking() {
    let mut surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    surface.stamp_dab(0.0, 0.0, 20, Rgb::BLACK);
    surface.stamp_dab(299.0, 299.0, 20, Rgb::BLACK);
    assert_eq!(surface.pixel(0, 0), Rgb::BLACK);
    assert_eq!(surface.pixel(299, 299), Rgb::BLACK);
}

#[test]
fn rgba_export_has_opaque_alpha() {
    let surface = Surface::new(CanvasSize::Small, CanvasType::Blackboard);
    let rgba = surface.rgba();
    assert_eq!(rgba.len(), 300 * 300 * 4);
    assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
}

#[test]
fn snapshot_is_a_png_data_url() {
    let surface = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    let url = surface.encode_data_url().expect("encode");
    assert!(url.starts_with("data:image/png;base64,"), "got {}", &url[..40.min(url.len())]);
}

#[test]
fn snapshot_is_bit_exact_for_identical_content() {
    let mut a = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    let mut b = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    a.stroke_segment(20.0, 20.0, 80.0, 90.0, 7, Rgb { r: 10, g: 120, b: 240 });
    b.stroke_segment(20.0, 20.0, 80.0, 90.0, 7, Rgb { r: 10, g: 120, b: 240 });
    assert_eq!(a.encode_data_url().expect("encode a"), b.encode_data_url().expect("encode b"));
}

#[test]
fn differing_content_encodes_differently() {
    let a = Surface::new(CanvasSize::Small, CanvasType::Whiteboard);
    let b = Surface::new(CanvasSize::Small, CanvasType::Blackboard);
    assert_ne!(a.encode_data_url().expect("a"), b.encode_data_url().expect("b"));
}

#[test]
fn hex_colors_parse_like_the_picker_emits_them() {
    assert_eq!(Rgb::from_hex("#000000"), Some(Rgb::BLACK));
    assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
    assert_eq!(Rgb::from_hex("#ff8001"), Some(Rgb { r: 255, g: 128, b: 1 }));
    assert_eq!(Rgb::from_hex("ff8001"), None, "missing hash");
    assert_eq!(Rgb::from_hex("#fff"), None, "short form not emitted by the picker");
    assert_eq!(Rgb::from_hex("#gg0000"), None);
}
