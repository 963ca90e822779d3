//! Camera capture and pipeline configuration.
//!
//! The file format mirrors the pipeline: one section for the camera,
//! one for the detector and one for the run loop.

use super::PixelFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Pixel encoding delivered by the sensor.
    pub pixel_format: PixelFormat,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 320, // QVGA
            height: 240,
            fps: 15,
            pixel_format: PixelFormat::Grayscale,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("invalid grid cell size (must be at least 1 pixel)")]
    InvalidCellSize,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Pass verbose diagnostics to the inference engine.
    pub debug: bool,
    /// Model input width in pixels.
    pub input_width: u32,
    /// Model input height in pixels.
    pub input_height: u32,
    /// Feed the model RGB888 instead of grayscale.
    pub color: bool,
    /// Side of one grid cell in model input pixels.
    pub grid_cell_size: u32,
    /// Mean luminance above which a cell is reported as an object.
    pub grid_threshold: u8,
    /// Maximum number of raw detection slots.
    pub max_detections: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            input_width: 96,
            input_height: 96,
            color: false,
            grid_cell_size: 8, // FOMO output stride
            grid_threshold: 160,
            max_detections: 10,
        }
    }
}

impl DetectorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_width == 0 || self.input_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.grid_cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run continuously (true) or process fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Print a Prometheus text dump when the run ends.
    pub print_metrics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 20,
            print_metrics: false,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        config.detector.validate()?;
        Ok(config)
    }
}
