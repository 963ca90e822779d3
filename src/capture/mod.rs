//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from a camera
//! and managing pipeline configuration. The detector treats a frame as
//! an opaque byte buffer with a declared geometry and pixel format.

mod camera;
mod config;
mod frame;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, DetectorConfig, FileConfig, OutputConfig};
pub use frame::{Frame, PixelFormat};
