//! Object detector.
//!
//! Ties the pipeline together for one frame at a time:
//!
//! ```text
//! frame → resampler → input buffer → FrameSignal → engine → result → boxes
//! ```
//!
//! The input buffer and the result are sized once from the engine's
//! [`ModelParameters`](crate::inference::ModelParameters) and reused for
//! every call.

mod bbox;
mod error;

pub use bbox::BoundingBox;
pub use error::{DetectError, ErrorKind};

use std::time::Duration;

use crate::benchmark::Benchmark;
use crate::capture::Frame;
use crate::inference::{ClassificationResult, InferenceEngine, RawBoundingBox};
use crate::signal::FrameSignal;
use crate::transform::{CropResampler, Resample};

/// Running totals across `detect_objects` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// Total calls, failed ones included.
    pub calls: u64,
    /// Calls that completed without error.
    pub successes: u64,
    /// Calls rejected because of the frame.
    pub input_errors: u64,
    /// Calls where the engine failed.
    pub inference_errors: u64,
    /// Objects found across all successful calls.
    pub objects: u64,
}

/// Runs an inference engine over captured frames.
///
/// A detector exclusively owns its buffers; use one detector per thread.
/// After a failed call the result must not be read: check the returned
/// error (or [`Detector::is_ok`]) before calling [`Detector::found`],
/// [`Detector::for_each`] or [`Detector::count`].
pub struct Detector<E, R = CropResampler> {
    engine: E,
    resampler: R,
    input: Box<[u8]>,
    result: ClassificationResult,
    last_error: Option<DetectError>,
    benchmark: Benchmark,
    stats: DetectionStats,
    is_color: bool,
    debug: bool,
}

impl<E: InferenceEngine> Detector<E> {
    /// Creates a detector using squash + nearest-neighbor resampling.
    pub fn new(engine: E) -> Self {
        Self::with_resampler(engine, CropResampler)
    }
}

impl<E: InferenceEngine, R: Resample> Detector<E, R> {
    pub fn with_resampler(engine: E, resampler: R) -> Self {
        let parameters = engine.parameters();
        let is_color = parameters.is_color();
        let input = vec![0u8; parameters.input_frame_size()].into_boxed_slice();
        let result = ClassificationResult::new(parameters.max_detections());

        tracing::info!(
            width = parameters.input_width(),
            height = parameters.input_height(),
            color = is_color,
            slots = parameters.max_detections(),
            "Detector created"
        );

        Self {
            engine,
            resampler,
            input,
            result,
            last_error: None,
            benchmark: Benchmark::new(),
            stats: DetectionStats::default(),
            is_color,
            debug: false,
        }
    }

    /// Enables or disables verbose engine diagnostics.
    pub fn configure(&mut self, debug_enabled: bool) {
        self.debug = debug_enabled;
    }

    #[inline]
    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Whether the model is fed RGB888 rather than grayscale.
    #[inline]
    pub fn is_color(&self) -> bool {
        self.is_color
    }

    /// Runs detection on `frame`.
    ///
    /// An empty frame is rejected before anything else runs, leaving the
    /// previous result in place. On an engine failure the result is left
    /// in an unspecified state.
    pub fn detect_objects(&mut self, frame: &Frame) -> Result<(), DetectError> {
        self.stats.calls += 1;
        let outcome = self.run(frame);

        match &outcome {
            Ok(()) => {
                self.stats.successes += 1;
                self.stats.objects += self.count() as u64;
                self.last_error = None;
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Input => self.stats.input_errors += 1,
                    ErrorKind::Inference => self.stats.inference_errors += 1,
                }
                self.last_error = Some(e.clone());
            }
        }

        outcome
    }

    fn run(&mut self, frame: &Frame) -> Result<(), DetectError> {
        if frame.is_empty() {
            return Err(DetectError::EmptyFrame);
        }

        let parameters = self.engine.parameters();
        let (width, height) = (parameters.input_width(), parameters.input_height());
        let samples = parameters.raw_sample_count();

        self.benchmark.start();

        if let Err(e) = self
            .resampler
            .resample(frame, width, height, self.is_color, &mut self.input)
        {
            self.benchmark.stop();
            return Err(e.into());
        }

        self.result.reset();
        let signal = FrameSignal::new(&self.input, samples, self.is_color);
        let status = self.engine.run(&signal, &mut self.result, self.debug);

        self.benchmark.stop();

        if !status.is_ok() {
            return Err(DetectError::Inference {
                code: status.code(),
            });
        }

        tracing::debug!(
            sequence = frame.sequence(),
            source_width = frame.width(),
            source_height = frame.height(),
            slots = self.result.len(),
            elapsed_us = self.benchmark.elapsed().as_micros() as u64,
            "Detection complete"
        );

        Ok(())
    }

    /// True when the first slot holds an object.
    ///
    /// Assumes the engine puts detections before background slots; see
    /// [`Detector::count`] for an exhaustive check.
    pub fn found(&self) -> bool {
        self.result
            .slots()
            .first()
            .is_some_and(|slot| !slot.is_background())
    }

    /// Detected boxes in engine order, background slots skipped.
    pub fn bounding_boxes(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        self.result
            .slots()
            .iter()
            .filter(|slot| !slot.is_background())
            .map(BoundingBox::from)
    }

    /// Calls `callback` with a running index and a copy of every box.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(usize, BoundingBox),
    {
        for (index, bbox) in self.bounding_boxes().enumerate() {
            callback(index, bbox);
        }
    }

    /// Unfiltered slot at engine index `ix`, background included.
    pub fn at(&self, ix: usize) -> Option<RawBoundingBox> {
        self.result.slots().get(ix).copied()
    }

    /// First detected box, if any.
    pub fn first(&self) -> Option<BoundingBox> {
        self.bounding_boxes().next()
    }

    /// Number of detected (non-background) boxes.
    pub fn count(&self) -> usize {
        self.bounding_boxes().count()
    }

    /// Label of a box's class, when the model provides labels.
    pub fn label(&self, bbox: &BoundingBox) -> Option<&str> {
        self.engine.parameters().label(bbox.class_id)
    }

    pub fn dsp_time(&self) -> Duration {
        self.result.timing.dsp
    }

    pub fn classification_time(&self) -> Duration {
        self.result.timing.classification
    }

    pub fn total_time(&self) -> Duration {
        self.result.timing.total()
    }

    /// Wall-clock span of the last resample + inference.
    pub fn benchmark(&self) -> &Benchmark {
        &self.benchmark
    }

    /// Error of the last call, `None` after a success.
    pub fn last_error(&self) -> Option<&DetectError> {
        self.last_error.as_ref()
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.last_error.is_none()
    }

    pub fn stats(&self) -> &DetectionStats {
        &self.stats
    }

    pub fn result(&self) -> &ClassificationResult {
        &self.result
    }

    /// The resampled model input of the last call.
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn resampler(&self) -> &R {
        &self.resampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelFormat;
    use crate::inference::{ModelParameters, ScriptedEngine};
    use crate::transform::TransformError;
    use proptest::prelude::*;

    fn gray_detector() -> Detector<ScriptedEngine> {
        Detector::new(ScriptedEngine::new(ModelParameters::grayscale(8, 8)))
    }

    fn frame() -> Frame {
        Frame::grayscale(vec![50u8; 16 * 16], 16, 16)
    }

    /// Resampler that only counts calls.
    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl Resample for Counting {
        fn resample(
            &mut self,
            frame: &Frame,
            width: u32,
            height: u32,
            rgb: bool,
            out: &mut [u8],
        ) -> Result<(), TransformError> {
            self.calls += 1;
            CropResampler.resample(frame, width, height, rgb, out)
        }
    }

    #[test]
    fn test_empty_frame_rejected() {
        let mut engine = ScriptedEngine::new(ModelParameters::grayscale(8, 8));
        engine.push_detections([RawBoundingBox::new(1, 0, 0, 8, 8)]);
        let mut detector = Detector::with_resampler(engine, Counting::default());

        detector.detect_objects(&frame()).unwrap();
        let before = detector.result().slots().to_vec();

        let err = detector.detect_objects(&Frame::empty()).unwrap_err();

        assert_eq!(err, DetectError::EmptyFrame);
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(detector.resampler().calls, 1);
        assert_eq!(detector.engine().calls(), 1);
        assert_eq!(detector.result().slots(), before.as_slice());
        assert_eq!(detector.last_error(), Some(&DetectError::EmptyFrame));
    }

    #[test]
    fn test_inference_error_carries_code() {
        let mut detector = gray_detector();
        detector.engine_mut().push_failure(5);

        let err = detector.detect_objects(&frame()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Inference);
        assert!(err.to_string().contains('5'));
        assert!(!detector.is_ok());
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut detector = gray_detector();
        detector.engine_mut().push_failure(-3);

        assert!(detector.detect_objects(&frame()).is_err());
        assert!(detector.detect_objects(&frame()).is_ok());
        assert!(detector.is_ok());
        assert_eq!(detector.stats().inference_errors, 1);
        assert_eq!(detector.stats().successes, 1);
    }

    #[test]
    fn test_invalid_frame_is_input_error() {
        let mut detector = gray_detector();
        let broken = Frame::new(vec![1u8; 10], 16, 16, PixelFormat::Rgb888, 1);

        let err = detector.detect_objects(&broken).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(detector.engine().calls(), 0);
    }

    #[test]
    fn test_sentinel_slots_skipped() {
        let mut detector = gray_detector();
        detector.engine_mut().push_detections([
            RawBoundingBox::new(1, 0, 0, 8, 8),
            RawBoundingBox::new(0, 8, 0, 8, 8),
            RawBoundingBox::new(2, 16, 0, 8, 8),
        ]);
        detector.detect_objects(&frame()).unwrap();

        let mut seen = Vec::new();
        detector.for_each(|i, bbox| seen.push((i, bbox.class_id)));

        assert_eq!(seen, vec![(0, 1), (1, 2)]);
        assert_eq!(detector.count(), 2);
        assert!(detector.found());
        assert_eq!(detector.at(1).map(|s| s.class_id), Some(0));
        assert_eq!(detector.at(3), None);
        assert_eq!(detector.first(), Some(BoundingBox::new(1, 0, 0, 8, 8)));
    }

    #[test]
    fn test_found_only_looks_at_first_slot() {
        let mut detector = gray_detector();
        detector.engine_mut().push_detections([
            RawBoundingBox::new(0, 0, 0, 8, 8),
            RawBoundingBox::new(1, 8, 0, 8, 8),
        ]);
        detector.detect_objects(&frame()).unwrap();

        assert!(!detector.found());
        assert_eq!(detector.count(), 1);
    }

    #[test]
    fn test_configure_reaches_engine() {
        let mut detector = gray_detector();
        detector.configure(true);
        assert!(detector.is_debug_enabled());

        detector.detect_objects(&frame()).unwrap();
        assert_eq!(detector.engine().debug_calls(), 1);
    }

    #[test]
    fn test_color_from_model() {
        let detector = Detector::new(ScriptedEngine::new(ModelParameters::rgb(4, 4)));
        assert!(detector.is_color());
        assert_eq!(detector.input().len(), 48);
    }

    #[test]
    fn test_labels() {
        let params = ModelParameters::grayscale(8, 8).with_labels(["person"]);
        let detector = Detector::new(ScriptedEngine::new(params));
        assert_eq!(detector.label(&BoundingBox::new(1, 0, 0, 1, 1)), Some("person"));
    }

    proptest! {
        #[test]
        fn prop_count_matches_non_background(ids in proptest::collection::vec(0u32..4, 0..10)) {
            let mut detector = gray_detector();
            detector
                .engine_mut()
                .push_detections(ids.iter().map(|&id| RawBoundingBox::new(id, 0, 0, 1, 1)));
            detector.detect_objects(&frame()).unwrap();

            let expected = ids.iter().filter(|&&id| id != 0).count();
            prop_assert_eq!(detector.count(), expected);

            let mut visited = Vec::new();
            detector.for_each(|_, bbox| visited.push(bbox.class_id));
            let non_background: Vec<u32> = ids.iter().copied().filter(|&id| id != 0).collect();
            prop_assert_eq!(visited, non_background);
        }
    }
}
