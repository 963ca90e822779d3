//! Inference engine interface.
//!
//! The trained model is opaque to the detector. An engine describes the
//! input it needs through [`ModelParameters`], pulls samples from a
//! [`Signal`], and writes detections into a [`ClassificationResult`].

mod grid;
mod result;
mod scripted;

pub use grid::GridEngine;
pub use result::{ClassificationResult, RawBoundingBox, Timing};
pub use scripted::ScriptedEngine;

use crate::signal::Signal;

/// Status code returned by an engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineStatus(pub i32);

impl EngineStatus {
    pub const OK: Self = Self(0);
    pub const SHAPES_DONT_MATCH: Self = Self(-1);
    pub const CANCELED: Self = Self(-2);
    pub const DSP_ERROR: Self = Self(-5);
    pub const ALLOC_FAILED: Self = Self(-8);

    #[inline]
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input geometry and output shape of a compiled model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParameters {
    input_width: u32,
    input_height: u32,
    input_frame_size: usize,
    raw_sample_count: usize,
    max_detections: usize,
    labels: Vec<String>,
}

impl ModelParameters {
    /// A model taking one grayscale byte per input pixel.
    pub fn grayscale(width: u32, height: u32) -> Self {
        Self::with_channels(width, height, 1)
    }

    /// A model taking three RGB bytes per input pixel.
    pub fn rgb(width: u32, height: u32) -> Self {
        Self::with_channels(width, height, 3)
    }

    fn with_channels(width: u32, height: u32, channels: usize) -> Self {
        let samples = width as usize * height as usize;
        Self {
            input_width: width,
            input_height: height,
            input_frame_size: samples * channels,
            raw_sample_count: samples,
            max_detections: 10,
            labels: Vec::new(),
        }
    }

    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    /// Class labels, starting at class id 1.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    #[inline]
    pub fn input_height(&self) -> u32 {
        self.input_height
    }

    /// Size of the model input buffer in bytes.
    #[inline]
    pub fn input_frame_size(&self) -> usize {
        self.input_frame_size
    }

    /// Number of samples the engine reads from the signal.
    #[inline]
    pub fn raw_sample_count(&self) -> usize {
        self.raw_sample_count
    }

    #[inline]
    pub fn max_detections(&self) -> usize {
        self.max_detections
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label for a class id. Class 0 is background and has none.
    pub fn label(&self, class_id: u32) -> Option<&str> {
        let index = (class_id as usize).checked_sub(1)?;
        self.labels.get(index).map(String::as_str)
    }

    /// True when the input buffer holds more than one byte per sample.
    pub fn is_color(&self) -> bool {
        self.raw_sample_count > 0 && self.input_frame_size / self.raw_sample_count > 1
    }
}

/// A model runtime.
///
/// Implementations may keep global state; callers sharing one must
/// serialize access themselves.
pub trait InferenceEngine {
    /// Geometry of the model input and the result capacity.
    fn parameters(&self) -> &ModelParameters;

    /// Runs the model over `signal`, writing into a freshly reset `result`.
    ///
    /// `debug` asks the engine for verbose diagnostics.
    fn run(
        &mut self,
        signal: &dyn Signal,
        result: &mut ClassificationResult,
        debug: bool,
    ) -> EngineStatus;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn parameters(&self) -> &ModelParameters {
        (**self).parameters()
    }

    fn run(
        &mut self,
        signal: &dyn Signal,
        result: &mut ClassificationResult,
        debug: bool,
    ) -> EngineStatus {
        (**self).run(signal, result, debug)
    }
}
