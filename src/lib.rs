//! FOMO Vision Library
//!
//! Turns captured camera frames into the fixed input a FOMO object
//! detection model expects, runs the model, and walks the detections.
//!
//! # Architecture
//!
//! ```text
//! capture → transform → signal → inference → detector
//!    ↓                                          ↓
//!  frame        (fixed input buffer)       bounding boxes
//! ```
//!
//! # Design Principles
//!
//! - **Buffers sized once**: the model input and result slots are allocated
//!   when the detector is built and reused for every frame
//! - **Lazy sampling**: the engine pulls packed pixels through a signal
//!   instead of receiving a float tensor copy
//! - **Errors are values**: every failure is a recoverable `DetectError`
//!
//! # Example
//!
//! ```
//! use fomo_vision::{
//!     capture::{Camera, CaptureConfig, MockCamera},
//!     inference::{GridEngine, ModelParameters},
//!     Detector,
//! };
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let engine = GridEngine::new(ModelParameters::grayscale(96, 96), 8, 160);
//! let mut detector = Detector::new(engine);
//!
//! let frame = camera.capture().unwrap();
//! if detector.detect_objects(&frame).is_ok() {
//!     detector.for_each(|i, bbox| println!("#{i}: {bbox}"));
//! }
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod benchmark;
pub mod capture;
pub mod detector;
pub mod inference;
pub mod metrics;
pub mod signal;
pub mod transform;

// Re-export commonly used types at crate root
pub use benchmark::Benchmark;
pub use capture::{Camera, CaptureConfig, FileConfig, Frame, MockCamera, PixelFormat};
pub use detector::{BoundingBox, DetectError, DetectionStats, Detector, ErrorKind};
pub use inference::{
    ClassificationResult, EngineStatus, GridEngine, InferenceEngine, ModelParameters,
    RawBoundingBox, ScriptedEngine,
};
pub use signal::{FrameSignal, Signal};
pub use transform::{Crop, CropResampler, Resample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
