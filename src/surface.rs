//! Raster surface backing the sketch canvas.
//!
//! The pixel buffer lives in Rust rather than in the HTML canvas so that
//! background fills, stroke rasterization and the submitted snapshot are all
//! host-testable. The browser layer blits the buffer into a `<canvas>` via
//! `ImageData` after each mutation; `encode_data_url` produces the portable
//! `data:image/png;base64,...` form that submitted drawings travel as.

use thiserror::Error;

// --- Colors ------------------------------------------------------------------

/// 8-bit RGB color. Brush colors arrive from the picker as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parses a `#rrggbb` string (the `<input type="color">` value format).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }
}

// --- Canvas variants ---------------------------------------------------------

/// Background theme of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasType {
    #[default]
    Whiteboard,
    Blackboard,
}

impl CanvasType {
    pub const ALL: [CanvasType; 2] = [CanvasType::Whiteboard, CanvasType::Blackboard];

    pub fn background(self) -> Rgb {
        match self {
            CanvasType::Whiteboard => Rgb::WHITE,
            CanvasType::Blackboard => Rgb::BLACK,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasType::Whiteboard => "whiteboard",
            CanvasType::Blackboard => "blackboard",
        }
    }
}

/// Side length of the square surface. Only these three sizes are offered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl CanvasSize {
    pub const ALL: [CanvasSize; 3] = [CanvasSize::Small, CanvasSize::Medium, CanvasSize::Large];

    pub fn px(self) -> u32 {
        match self {
            CanvasSize::Small => 300,
            CanvasSize::Medium => 500,
            CanvasSize::Large => 700,
        }
    }
}

// --- Snapshot encoding errors ------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

// --- Surface -----------------------------------------------------------------

/// Square RGB raster buffer, row-major, 3 bytes per pixel.
pub struct Surface {
    size: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(size: CanvasSize, ty: CanvasType) -> Self {
        let px = size.px();
        let mut surface = Surface {
            size: px,
            pixels: vec![0; px as usize * px as usize * 3],
        };
        surface.reset(ty);
        surface
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Clears the whole buffer and refills it with the type's background.
    /// Runs synchronously; callers invoke it before any stroke for a new
    /// prompt can land, so no stale background survives a prompt or type
    /// change.
    pub fn reset(&mut self, ty: CanvasType) {
        let bg = ty.background();
        for chunk in self.pixels.chunks_exact_mut(3) {
            chunk[0] = bg.r;
            chunk[1] = bg.g;
            chunk[2] = bg.b;
        }
    }

    /// Samples one pixel. Out-of-range coordinates panic; this is a test and
    /// debugging hook, not a hot path.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.size && y < self.size, "pixel ({x},{y}) outside {0}x{0} surface", self.size);
        let idx = (y as usize * self.size as usize + x as usize) * 3;
        Rgb {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
        }
    }

    fn put(&mut self, x: i64, y: i64, c: Rgb) {
        if x < 0 || y < 0 || x >= self.size as i64 || y >= self.size as i64 {
            return;
        }
        let idx = (y as usize * self.size as usize + x as usize) * 3;
        self.pixels[idx] = c.r;
        self.pixels[idx + 1] = c.g;
        self.pixels[idx + 2] = c.b;
    }

    /// Stamps one round brush dab centered at (cx, cy). `width` is the brush
    /// diameter in pixels.
    pub fn stamp_dab(&mut self, cx: f64, cy: f64, width: u32, c: Rgb) {
        let r = width as f64 / 2.0;
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                // Compare against the pixel center so a width-1 brush still
                // covers the pixel under the pointer.
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r || (width == 1 && dx.abs() < 0.5 && dy.abs() < 0.5) {
                    self.put(x, y, c);
                }
            }
        }
    }

    /// Draws a round-capped segment by stamping dabs from (x0, y0) to
    /// (x1, y1) at sub-pixel spacing.
    pub fn stroke_segment(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: u32, c: Rgb) {
        let dist = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = dist.ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.stamp_dab(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, width, c);
        }
    }

    /// RGBA copy of the buffer for `ImageData` blitting (alpha fixed at 255).
    pub fn rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size as usize * self.size as usize * 4);
        for chunk in self.pixels.chunks_exact(3) {
            out.extend_from_slice(chunk);
            out.push(255);
        }
        out
    }

    /// Encodes the current contents as a PNG data URL. Deterministic: the
    /// same buffer always encodes to the same string, which is what makes a
    /// submitted snapshot bit-exact.
    pub fn encode_data_url(&self) -> Result<String, EncodeError> {
        let mut bytes: Vec<u8> = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.size, self.size);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(format!("data:image/png;base64,{}", base64::encode(&bytes)))
    }
}
