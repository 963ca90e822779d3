//! Frame resampling.
//!
//! Converts a captured frame of any geometry and pixel format into the
//! fixed geometry and encoding a model expects.

mod crop;

pub use crop::{Crop, Interpolation, ResizePolicy};

use crate::capture::{Frame, PixelFormat};
use thiserror::Error;

/// Errors that can occur while resampling a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("source frame is empty")]
    EmptySource,
    #[error("source has {len} bytes, which does not match {width}x{height} {format:?}")]
    GeometryMismatch {
        len: usize,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    #[error("invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
    #[error("output buffer has {actual} bytes, expected {expected}")]
    OutputSize { expected: usize, actual: usize },
}

/// Something that can fill a fixed model input buffer from a frame.
pub trait Resample {
    /// Writes `frame` resized to `width * height` into `out`, as RGB888 when
    /// `rgb` is set and grayscale otherwise.
    fn resample(
        &mut self,
        frame: &Frame,
        width: u32,
        height: u32,
        rgb: bool,
        out: &mut [u8],
    ) -> Result<(), TransformError>;
}

/// Squash + nearest-neighbor resampler used by the detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropResampler;

impl Resample for CropResampler {
    fn resample(
        &mut self,
        frame: &Frame,
        width: u32,
        height: u32,
        rgb: bool,
        out: &mut [u8],
    ) -> Result<(), TransformError> {
        Crop::from(frame)
            .to(width, height)
            .squash()
            .rgb(rgb)
            .nearest()
            .apply(out)
    }
}

/// Integer BT.601 luminance.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

/// Packs an RGB888 color into big-endian RGB565 bytes.
#[inline]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> [u8; 2] {
    let v = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
    v.to_be_bytes()
}

/// Expands big-endian RGB565 bytes to RGB888.
#[inline]
pub fn unpack_rgb565(hi: u8, lo: u8) -> [u8; 3] {
    let v = u16::from_be_bytes([hi, lo]);
    let r = ((v >> 11) & 0x1f) as u8;
    let g = ((v >> 5) & 0x3f) as u8;
    let b = (v & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Reads pixel `index` of a buffer in `format` as RGB888.
#[inline]
pub(crate) fn read_rgb(pixels: &[u8], format: PixelFormat, index: usize) -> [u8; 3] {
    match format {
        PixelFormat::Grayscale => {
            let v = pixels[index];
            [v, v, v]
        }
        PixelFormat::Rgb888 => {
            let o = index * 3;
            [pixels[o], pixels[o + 1], pixels[o + 2]]
        }
        PixelFormat::Rgb565 => {
            let o = index * 2;
            unpack_rgb565(pixels[o], pixels[o + 1])
        }
    }
}
