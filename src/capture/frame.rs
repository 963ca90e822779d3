//! Frame type representing a captured image with metadata.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Pixel encoding of a captured frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// One byte per pixel, luminance only.
    #[default]
    Grayscale,
    /// Three bytes per pixel, R then G then B.
    Rgb888,
    /// Two bytes per pixel, big-endian 5-6-5 as produced by the camera sensor.
    Rgb565,
}

impl PixelFormat {
    /// Returns the number of bytes a single pixel occupies.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Grayscale => 1,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Rgb565 => 2,
        }
    }

    /// Returns true for formats carrying color information.
    #[inline]
    pub fn is_color(self) -> bool {
        !matches!(self, PixelFormat::Grayscale)
    }
}

/// A single captured frame from the camera.
///
/// The detector only reads the pixel data; geometry and format tell the
/// resampler how to interpret it.
#[derive(Clone)]
pub struct Frame {
    /// Raw pixel data, laid out row-major in `format`.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Pixel encoding.
    format: PixelFormat,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        sequence: u64,
    ) -> Self {
        Self {
            pixels,
            width,
            height,
            format,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a grayscale frame.
    pub fn grayscale(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(pixels, width, height, PixelFormat::Grayscale, 0)
    }

    /// Creates an RGB888 frame.
    pub fn rgb(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self::new(pixels, width, height, PixelFormat::Rgb888, 0)
    }

    /// Creates a frame with no pixel data, as returned by a failed capture.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, PixelFormat::Grayscale, 0)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel encoding.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the length of the pixel buffer in bytes. Zero means empty.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns true if the frame carries no pixel data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions and format.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * self.format.bytes_per_pixel()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 320 * 240];
        let frame = Frame::new(pixels, 320, 240, PixelFormat::Grayscale, 1);

        assert_eq!(frame.width(), 320);
        assert_eq!(frame.height(), 240);
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.len(), 320 * 240);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_rgb565_size() {
        let frame = Frame::new(vec![0u8; 8 * 8 * 2], 8, 8, PixelFormat::Rgb565, 1);
        assert!(frame.is_valid());

        let frame = Frame::new(vec![0u8; 8 * 8 * 3], 8, 8, PixelFormat::Rgb565, 1);
        assert!(!frame.is_valid());
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::rgb(pixels, 64, 48);

        assert!(!frame.is_valid());
    }
}
