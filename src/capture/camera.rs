//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame, PixelFormat};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

const BACKGROUND: [u8; 3] = [16, 16, 16];
const OBJECT: [u8; 3] = [240, 200, 40];

/// Mock camera that renders a synthetic scene.
///
/// Each frame is a dark background with one bright square that slides
/// to the right by one square width per captured frame, wrapping at the
/// right edge.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the square (x, y, side) drawn into the frame with `sequence`.
    pub fn object_position(width: u32, height: u32, sequence: u64) -> (u32, u32, u32) {
        let side = (width.min(height) / 4).max(1);
        let slots = (width / side).max(1) as u64;
        let x = (sequence % slots) as u32 * side;
        let y = (height - side) / 2;
        (x, y, side)
    }

    fn render(config: &CaptureConfig, sequence: u64) -> Vec<u8> {
        let (ox, oy, side) = Self::object_position(config.width, config.height, sequence);
        let bpp = config.pixel_format.bytes_per_pixel();
        let mut pixels = Vec::with_capacity(config.width as usize * config.height as usize * bpp);

        for y in 0..config.height {
            for x in 0..config.width {
                let inside = x >= ox && x < ox + side && y >= oy && y < oy + side;
                let [r, g, b] = if inside { OBJECT } else { BACKGROUND };
                match config.pixel_format {
                    PixelFormat::Grayscale => pixels.push(crate::transform::luma(r, g, b)),
                    PixelFormat::Rgb888 => pixels.extend_from_slice(&[r, g, b]),
                    PixelFormat::Rgb565 => {
                        pixels.extend_from_slice(&crate::transform::pack_rgb565(r, g, b))
                    }
                }
            }
        }

        pixels
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let pixels = Self::render(config, self.sequence);

        self.sequence += 1;
        Ok(Frame::new(
            pixels,
            config.width,
            config.height,
            config.pixel_format,
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(
            camera.capture(),
            Err(CameraError::NotInitialized)
        ));
    }

    #[test]
    fn test_renders_every_format() {
        for format in [PixelFormat::Grayscale, PixelFormat::Rgb888, PixelFormat::Rgb565] {
            let mut camera = MockCamera::new();
            let config = CaptureConfig {
                pixel_format: format,
                ..CaptureConfig::with_dimensions(40, 20)
            };
            camera.open(&config).unwrap();

            let frame = camera.capture().unwrap();
            assert_eq!(frame.format(), format);
            assert!(frame.is_valid());
        }
    }

    #[test]
    fn test_object_is_bright() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::with_dimensions(40, 40)).unwrap();
        let frame = camera.capture().unwrap();

        let (x, y, side) = MockCamera::object_position(40, 40, 0);
        let center = ((y + side / 2) * 40 + x + side / 2) as usize;
        assert!(frame.pixels()[center] > 150);
        assert!(frame.pixels()[0] < 32);
    }

    #[test]
    fn test_object_moves_between_frames() {
        let (x0, _, _) = MockCamera::object_position(40, 40, 0);
        let (x1, _, side) = MockCamera::object_position(40, 40, 1);
        assert_eq!(x1, x0 + side);
    }
}
