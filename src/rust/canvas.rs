//! The drawing surface: pen settings, a freehand canvas and the RGBA pixel
//! buffers it produces.

use image::{Rgba, RgbaImage};
use ndarray::Array3;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const CANVAS_WIDTH: u32 = 400;
pub const CANVAS_HEIGHT: u32 = 300;
pub const MIN_STROKE_WIDTH: u32 = 5;
pub const MAX_STROKE_WIDTH: u32 = 25;
pub const DEFAULT_STROKE_WIDTH: u32 = 15;

/// Raw `(height, width, channels)` u8 pixel grid, RGBA when produced here.
pub type PixelBuffer = Array3<u8>;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Stroke width {0} out of range (5-25)")]
    StrokeWidth(u32),
    #[error("Failed to read drawing: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed stroke file: {0}")]
    Strokes(#[from] serde_json::Error),
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor { r: 0, g: 0, b: 0 };
    pub const WHITE: HexColor = HexColor { r: 255, g: 255, b: 255 };

    fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for HexColor {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CanvasError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Pen and background configuration of the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    stroke_width: u32,
    pub stroke_color: HexColor,
    pub background_color: HexColor,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_color: HexColor::BLACK,
            background_color: HexColor::WHITE,
        }
    }
}

impl CanvasSettings {
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: u32) -> Result<(), CanvasError> {
        if !(MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&width) {
            return Err(CanvasError::StrokeWidth(width));
        }
        self.stroke_width = width;
        Ok(())
    }
}

/// A freehand drawing: each stroke is a polyline of `[x, y]` canvas points.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Drawing {
    pub strokes: Vec<Vec<[f32; 2]>>,
}

impl Drawing {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CanvasError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// A fixed-size RGBA surface painted with round, anti-aliased pen strokes.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(settings: &CanvasSettings) -> Self {
        let [r, g, b] = settings.background_color.channels();
        Self {
            image: RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([r, g, b, 255])),
        }
    }

    pub fn clear(&mut self, settings: &CanvasSettings) {
        *self = Self::new(settings);
    }

    pub fn draw(&mut self, drawing: &Drawing, settings: &CanvasSettings) {
        for stroke in &drawing.strokes {
            self.stroke(stroke, settings);
        }
    }

    /// Paints one polyline with the current pen.
    pub fn stroke(&mut self, points: &[[f32; 2]], settings: &CanvasSettings) {
        let Some(&first) = points.first() else {
            return;
        };
        let radius = settings.stroke_width() as f32 / 2.0;
        let (width, height) = self.image.dimensions();
        let mut coverage = vec![0.0f32; (width * height) as usize];

        if points.len() == 1 {
            stamp_segment(&mut coverage, width, height, first, first, radius);
        }
        for pair in points.windows(2) {
            stamp_segment(&mut coverage, width, height, pair[0], pair[1], radius);
        }

        let pen = settings.stroke_color.channels();
        for (index, &amount) in coverage.iter().enumerate() {
            if amount <= 0.0 {
                continue;
            }
            let x = index as u32 % width;
            let y = index as u32 / width;
            let pixel = self.image.get_pixel_mut(x, y);
            for c in 0..3 {
                let blended = pixel[c] as f32 * (1.0 - amount) + pen[c] as f32 * amount;
                pixel[c] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    pub fn pixels(&self) -> PixelBuffer {
        rgba_to_buffer(&self.image)
    }
}

fn stamp_segment(
    coverage: &mut [f32],
    width: u32,
    height: u32,
    a: [f32; 2],
    b: [f32; 2],
    radius: f32,
) {
    let reach = radius + 1.0;
    let min_x = (a[0].min(b[0]) - reach).floor().max(0.0) as u32;
    let min_y = (a[1].min(b[1]) - reach).floor().max(0.0) as u32;
    let max_x = ((a[0].max(b[0]) + reach).ceil().max(0.0) as u32).min(width);
    let max_y = ((a[1].max(b[1]) + reach).ceil().max(0.0) as u32).min(height);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let center = [x as f32 + 0.5, y as f32 + 0.5];
            let amount = (radius + 0.5 - distance_to_segment(center, a, b)).clamp(0.0, 1.0);
            let slot = &mut coverage[(y * width + x) as usize];
            if amount > *slot {
                *slot = amount;
            }
        }
    }
}

fn distance_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt()
}

fn rgba_to_buffer(image: &RgbaImage) -> PixelBuffer {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((height as usize, width as usize, 4), |(y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c]
    })
}

/// Decodes an image file into an RGBA pixel buffer, standing in for a
/// snapshot of the browser canvas.
pub fn load_pixel_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, CanvasError> {
    let image = image::open(path)?.to_rgba8();
    Ok(rgba_to_buffer(&image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color: HexColor = "#1a2B3c".parse().unwrap();
        assert_eq!(color, HexColor { r: 0x1a, g: 0x2b, b: 0x3c });
        assert_eq!(color.to_string(), "#1A2B3C");
        assert!("000000".parse::<HexColor>().is_err());
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#GG0000".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_stroke_width_bounds() {
        let mut settings = CanvasSettings::default();
        assert_eq!(settings.stroke_width(), 15);
        assert!(settings.set_stroke_width(4).is_err());
        assert!(settings.set_stroke_width(26).is_err());
        settings.set_stroke_width(25).unwrap();
        assert_eq!(settings.stroke_width(), 25);
    }

    #[test]
    fn test_blank_canvas_is_uniform() {
        let canvas = Canvas::new(&CanvasSettings::default());
        let pixels = canvas.pixels();
        assert_eq!(pixels.shape(), &[300, 400, 4]);
        assert!(pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_stroke_paints_pen_color_with_soft_edges() {
        let settings = CanvasSettings::default();
        let mut canvas = Canvas::new(&settings);
        canvas.stroke(&[[50.0, 150.0], [350.0, 150.0]], &settings);
        let pixels = canvas.pixels();

        // stroke center is solid pen color, alpha untouched
        assert_eq!(pixels[[150, 200, 0]], 0);
        assert_eq!(pixels[[150, 200, 3]], 255);
        // far from the stroke stays background
        assert_eq!(pixels[[20, 200, 0]], 255);
        // anti-aliased edge produces intermediate values
        assert!(pixels.iter().any(|&v| v > 0 && v < 255));
    }

    #[test]
    fn test_single_point_leaves_a_dot() {
        let settings = CanvasSettings::default();
        let mut canvas = Canvas::new(&settings);
        canvas.stroke(&[[100.0, 100.0]], &settings);
        assert_eq!(canvas.pixels()[[100, 100, 1]], 0);
    }

    #[test]
    fn test_drawing_from_json() {
        let drawing: Drawing = serde_json::from_str("[[[1, 2], [3, 4]], [[5, 6]]]").unwrap();
        assert_eq!(drawing.strokes.len(), 2);
        assert_eq!(drawing.strokes[0][1], [3.0, 4.0]);
    }
}
