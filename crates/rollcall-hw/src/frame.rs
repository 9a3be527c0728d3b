//! Frame plumbing: YUYV decode, horizontal mirror, JPEG encode.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// JPEG quality for captured photos.
const SNAPSHOT_JPEG_QUALITY: u8 = 90;

/// A decoded RGB frame (3 bytes per pixel, row-major).
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid YUYV length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Convert a packed YUYV 4:2:2 buffer to RGB using BT.601 coefficients.
///
/// Every 4 bytes carry two pixels: [Y0, U, Y1, V].
pub fn yuyv_to_rgb(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let pixels = (width * height) as usize;
    let expected = pixels * 2;
    if buf.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: buf.len(),
        });
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for chunk in buf[..expected].chunks_exact(4) {
        let u = chunk[1] as i32 - 128;
        let v = chunk[3] as i32 - 128;
        for &y in &[chunk[0], chunk[2]] {
            let c = 298 * (y as i32 - 16);
            rgb.push(clamp_u8((c + 409 * v + 128) >> 8));
            rgb.push(clamp_u8((c - 100 * u - 208 * v + 128) >> 8));
            rgb.push(clamp_u8((c + 516 * u + 128) >> 8));
        }
    }
    Ok(rgb)
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Flip an RGB buffer across its vertical axis, in place, so the frozen
/// snapshot matches the selfie-style preview the operator sees.
pub fn mirror_rows(rgb: &mut [u8], width: u32, height: u32) {
    let width = width as usize;
    let row_bytes = width * 3;
    for row in rgb.chunks_exact_mut(row_bytes).take(height as usize) {
        for col in 0..width / 2 {
            let left = col * 3;
            let right = (width - 1 - col) * 3;
            for byte in 0..3 {
                row.swap(left + byte, right + byte);
            }
        }
    }
}

/// Encode an RGB frame as JPEG.
pub fn encode_jpeg(frame: &RgbFrame) -> Result<Vec<u8>, FrameError> {
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, SNAPSHOT_JPEG_QUALITY)
        .write_image(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| FrameError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
