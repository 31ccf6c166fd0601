//! Freehand stroke capture.
//!
//! Pointer input reaches this module as a tagged [`PointerEvent`] carrying
//! raw client coordinates, regardless of whether the browser delivered a
//! mouse or a touch event; the two expose different native fields, so the
//! event layer folds both into the same shape and the capture logic stays
//! source-agnostic. Coordinates are normalized into surface space by
//! subtracting the canvas's on-screen origin.

use log::debug;

use crate::surface::{CanvasSize, CanvasType, EncodeError, Rgb, Surface};

// --- Pointer input -----------------------------------------------------------

/// Where a pointer event originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// One pointer event in client (page-viewport) coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub source: PointerSource,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        PointerEvent { source: PointerSource::Mouse, client_x, client_y }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        PointerEvent { source: PointerSource::Touch, client_x, client_y }
    }

    /// Normalizes to surface-local coordinates given the surface's on-screen
    /// origin.
    pub fn to_surface(self, origin_x: f64, origin_y: f64) -> Point {
        Point {
            x: self.client_x - origin_x,
            y: self.client_y - origin_y,
        }
    }
}

/// A point in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

// --- Brush -------------------------------------------------------------------

pub const MIN_BRUSH_WIDTH: u32 = 1;
pub const MAX_BRUSH_WIDTH: u32 = 20;
pub const DEFAULT_BRUSH_WIDTH: u32 = 5;

/// Session-scoped brush settings. Changes apply to strokes opened afterward,
/// never retroactively.
#[derive(Clone, Copy, Debug)]
pub struct Brush {
    pub color: Rgb,
    pub width: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Brush { color: Rgb::BLACK, width: DEFAULT_BRUSH_WIDTH }
    }
}

impl Brush {
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
    }
}

// --- Strokes -----------------------------------------------------------------

/// One continuous pointer-down-to-up gesture. Append-only while open; the
/// whole set for a prompt is discarded on submit, only the raster survives.
#[derive(Clone, Debug)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Rgb,
    pub width: u32,
}

// --- Sketch pad --------------------------------------------------------------

/// Capture state for one prompt: the raster surface plus the stroke being
/// drawn, rendered incrementally so the player sees live feedback.
pub struct SketchPad {
    surface: Surface,
    brush: Brush,
    open: Option<Stroke>,
    strokes: Vec<Stroke>,
}

impl SketchPad {
    pub fn new(size: CanvasSize, ty: CanvasType) -> Self {
        SketchPad {
            surface: Surface::new(size, ty),
            brush: Brush::default(),
            open: None,
            strokes: Vec::new(),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.brush.set_color(color);
    }

    pub fn set_width(&mut self, width: u32) {
        self.brush.set_width(width);
    }

    /// Completed strokes for the current prompt (the open one not included).
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Whether a stroke is currently being drawn.
    pub fn stroke_open(&self) -> bool {
        self.open.is_some()
    }

    /// Opens a new stroke at `p` and stamps the first dab. An already-open
    /// stroke is closed first; the host occasionally drops a pointer-up.
    pub fn begin_stroke(&mut self, p: Point) {
        self.end_stroke();
        self.surface.stamp_dab(p.x, p.y, self.brush.width, self.brush.color);
        self.open = Some(Stroke {
            points: vec![p],
            color: self.brush.color,
            width: self.brush.width,
        });
    }

    /// Extends the open stroke to `p`, committing the segment to the surface
    /// immediately. A no-op when no stroke is open.
    pub fn extend_stroke(&mut self, p: Point) {
        let Some(stroke) = self.open.as_mut() else {
            return;
        };
        // The open stroke always holds at least its starting point.
        if let Some(last) = stroke.points.last().copied() {
            self.surface.stroke_segment(last.x, last.y, p.x, p.y, stroke.width, stroke.color);
        }
        stroke.points.push(p);
    }

    /// Closes the open stroke. Idempotent.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.open.take() {
            self.strokes.push(stroke);
        }
    }

    /// Refills the background for a new prompt or canvas type, dropping any
    /// strokes from the previous prompt.
    pub fn reset(&mut self, ty: CanvasType) {
        self.open = None;
        self.strokes.clear();
        self.surface.reset(ty);
    }

    /// Rebuilds the surface at a new size. Content does not survive a resize.
    pub fn resize(&mut self, size: CanvasSize, ty: CanvasType) {
        self.surface = Surface::new(size, ty);
        self.open = None;
        self.strokes.clear();
    }

    /// Finalizes the sketch: closes any open stroke, encodes the surface
    /// bit-exactly and discards the stroke set. Submitting with zero strokes
    /// is legal; the background alone is a valid drawing.
    pub fn submit(&mut self) -> Result<String, EncodeError> {
        self.end_stroke();
        let encoding = self.surface.encode_data_url()?;
        debug!("submitted sketch with {} stroke(s)", self.strokes.len());
        self.strokes.clear();
        Ok(encoding)
    }
}
