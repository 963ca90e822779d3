//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::detector::Detector;
use crate::inference::InferenceEngine;
use crate::transform::Resample;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of detector state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Total detection calls.
    pub frames_total: u64,
    /// Objects found across all successful calls.
    pub objects_total: u64,
    /// Calls rejected because of the input frame.
    pub input_errors: u64,
    /// Calls where the engine failed.
    pub inference_errors: u64,
    /// Objects in the most recent result.
    pub objects: usize,
    /// Whether the most recent result reported an object in its first slot.
    pub found: bool,
    /// Engine DSP time of the most recent call, in milliseconds.
    pub dsp_ms: f64,
    /// Engine classification time of the most recent call, in milliseconds.
    pub classification_ms: f64,
    /// Wall-clock time of the most recent call, in milliseconds.
    pub wall_ms: f64,
}

/// Prometheus metrics registry for detection monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Counters
    frames_total: IntCounter,
    objects_total: IntCounter,
    input_errors_total: IntCounter,
    inference_errors_total: IntCounter,

    // Last result
    objects: IntGauge,
    found: IntGauge,

    // Timing
    dsp_ms: Gauge,
    classification_ms: Gauge,
    wall_ms: Gauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all detection metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "fomo_vision_frames_total",
            "Total number of frames submitted for detection",
        )?;
        let objects_total = IntCounter::new(
            "fomo_vision_objects_total",
            "Total number of objects detected",
        )?;
        let input_errors_total = IntCounter::new(
            "fomo_vision_input_errors_total",
            "Frames rejected before inference",
        )?;
        let inference_errors_total = IntCounter::new(
            "fomo_vision_inference_errors_total",
            "Inference runs that returned a non-OK status",
        )?;

        let objects = IntGauge::new(
            "fomo_vision_objects",
            "Objects in the most recent result",
        )?;
        let found = IntGauge::new(
            "fomo_vision_found",
            "Whether the most recent result found an object (1=yes, 0=no)",
        )?;

        let dsp_ms = Gauge::new(
            "fomo_vision_dsp_milliseconds",
            "Signal processing time of the most recent run",
        )?;
        let classification_ms = Gauge::new(
            "fomo_vision_classification_milliseconds",
            "Classification time of the most recent run",
        )?;
        let wall_ms = Gauge::new(
            "fomo_vision_wall_milliseconds",
            "Wall-clock resample and inference time of the most recent run",
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(objects_total.clone()))?;
        registry.register(Box::new(input_errors_total.clone()))?;
        registry.register(Box::new(inference_errors_total.clone()))?;
        registry.register(Box::new(objects.clone()))?;
        registry.register(Box::new(found.clone()))?;
        registry.register(Box::new(dsp_ms.clone()))?;
        registry.register(Box::new(classification_ms.clone()))?;
        registry.register(Box::new(wall_ms.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            objects_total,
            input_errors_total,
            inference_errors_total,
            objects,
            found,
            dsp_ms,
            classification_ms,
            wall_ms,
        })
    }

    /// Updates all metrics from a snapshot of detector state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward by the difference
        advance(&self.frames_total, snapshot.frames_total);
        advance(&self.objects_total, snapshot.objects_total);
        advance(&self.input_errors_total, snapshot.input_errors);
        advance(&self.inference_errors_total, snapshot.inference_errors);

        self.objects.set(snapshot.objects as i64);
        self.found.set(if snapshot.found { 1 } else { 0 });

        self.dsp_ms.set(snapshot.dsp_ms);
        self.classification_ms.set(snapshot.classification_ms);
        self.wall_ms.set(snapshot.wall_ms);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the detector's current state.
    ///
    /// Result-derived fields are zeroed when the last call failed.
    pub fn from_detector<E: InferenceEngine, R: Resample>(detector: &Detector<E, R>) -> Self {
        let stats = detector.stats();
        let healthy = detector.is_ok();
        let ms = |d: std::time::Duration| d.as_secs_f64() * 1000.0;

        Self {
            frames_total: stats.calls,
            objects_total: stats.objects,
            input_errors: stats.input_errors,
            inference_errors: stats.inference_errors,
            objects: if healthy { detector.count() } else { 0 },
            found: healthy && detector.found(),
            dsp_ms: if healthy { ms(detector.dsp_time()) } else { 0.0 },
            classification_ms: if healthy {
                ms(detector.classification_time())
            } else {
                0.0
            },
            wall_ms: ms(detector.benchmark().elapsed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;
    use crate::inference::{ModelParameters, RawBoundingBox, ScriptedEngine};

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            frames_total: 10,
            objects_total: 7,
            input_errors: 1,
            inference_errors: 2,
            objects: 3,
            found: true,
            dsp_ms: 1.0,
            classification_ms: 4.0,
            wall_ms: 6.0,
        };

        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("fomo_vision_frames_total 10"));
        assert!(output.contains("fomo_vision_objects 3"));
        assert!(output.contains("fomo_vision_found 1"));
        assert!(output.contains("fomo_vision_inference_errors_total 2"));
    }

    #[test]
    fn test_counters_do_not_rewind() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            frames_total: 5,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            frames_total: 3,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("fomo_vision_frames_total 5"));
    }

    #[test]
    fn test_snapshot_from_detector() {
        let mut engine = ScriptedEngine::new(ModelParameters::grayscale(4, 4));
        engine
            .push_detections([RawBoundingBox::new(1, 0, 0, 2, 2)])
            .push_failure(-1);
        let mut detector = Detector::new(engine);
        let frame = Frame::grayscale(vec![0u8; 16], 4, 4);

        detector.detect_objects(&frame).unwrap();
        let snapshot = MetricsSnapshot::from_detector(&detector);
        assert_eq!(snapshot.frames_total, 1);
        assert_eq!(snapshot.objects, 1);
        assert!(snapshot.found);

        detector.detect_objects(&frame).unwrap_err();
        let snapshot = MetricsSnapshot::from_detector(&detector);
        assert_eq!(snapshot.frames_total, 2);
        assert_eq!(snapshot.inference_errors, 1);
        assert_eq!(snapshot.objects, 0);
        assert!(!snapshot.found);
    }
}
