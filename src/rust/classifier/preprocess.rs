//! Turns a raw canvas snapshot into the tensor the model consumes.
//!
//! The pipeline is fixed:
//! 1. interpret the `(H, W, 4)` buffer as RGBA
//! 2. drop the alpha channel (no compositing against the background)
//! 3. resize to 150x150 with bicubic resampling
//! 4. scale every channel to `[0.0, 1.0]` and add a leading batch axis

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array4, ArrayView3};

use super::error::ClassifierError;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 150;
/// Shape of the tensor produced by [`preprocess`]: `(batch, height, width, channels)`.
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];
/// A buffer with at most this many distinct values is treated as untouched.
pub const BLANK_DISTINCT_LIMIT: usize = 2;

const RESAMPLING: FilterType = FilterType::CatmullRom;

/// Converts an RGBA pixel buffer into a normalized `(1, 150, 150, 3)` tensor.
///
/// # Errors
/// - `InputFormat` if the buffer does not have exactly 4 channels
/// - `InputFormat` if the buffer has no pixels
pub fn preprocess(buffer: ArrayView3<'_, u8>) -> Result<Array4<f32>, ClassifierError> {
    let (height, width, channels) = buffer.dim();
    if channels != 4 {
        return Err(ClassifierError::InputFormat(format!(
            "Expected 4 channels (RGBA), got {}",
            channels
        )));
    }
    if height == 0 || width == 0 {
        return Err(ClassifierError::InputFormat(format!(
            "Pixel buffer is empty ({}x{})",
            width, height
        )));
    }

    let mut rgb = Vec::with_capacity(height * width * 3);
    for pixel in buffer.rows() {
        rgb.extend_from_slice(&[pixel[0], pixel[1], pixel[2]]);
    }
    let image = RgbImage::from_raw(width as u32, height as u32, rgb).ok_or_else(|| {
        ClassifierError::InputFormat(format!("Pixel buffer too large ({}x{})", width, height))
    })?;

    let resized = imageops::resize(&image, INPUT_SIZE, INPUT_SIZE, RESAMPLING);
    log::debug!("Resized {}x{} drawing to {}x{}", width, height, INPUT_SIZE, INPUT_SIZE);

    Ok(Array4::from_shape_fn(INPUT_SHAPE, |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    }))
}

/// Number of distinct byte values anywhere in the buffer, across all channels.
pub fn count_distinct_values(buffer: ArrayView3<'_, u8>) -> usize {
    let mut seen = [false; 256];
    let mut distinct = 0;
    for &value in buffer.iter() {
        let slot = &mut seen[value as usize];
        if !*slot {
            *slot = true;
            distinct += 1;
            if distinct == seen.len() {
                break;
            }
        }
    }
    distinct
}

/// Heuristic blank-canvas check: two or fewer distinct values means nothing
/// was drawn.
///
/// This also flags a drawing made of exactly two literal values (a solid,
/// non anti-aliased stroke on a solid background) as blank.
pub fn is_blank(buffer: ArrayView3<'_, u8>) -> bool {
    count_distinct_values(buffer) <= BLANK_DISTINCT_LIMIT
}
