//! Deterministic engine for tests and demos.

use std::collections::VecDeque;
use std::time::Duration;

use super::{
    ClassificationResult, EngineStatus, InferenceEngine, ModelParameters, RawBoundingBox, Timing,
};
use crate::signal::Signal;

#[derive(Debug, Clone)]
enum Outcome {
    Detections(Vec<RawBoundingBox>),
    Failure(EngineStatus),
}

/// Engine that replays queued outcomes.
///
/// Every run reads the whole signal in chunks of `chunk` samples, back to
/// front when `reversed`, and keeps the samples for inspection. It then
/// pops the next queued outcome; with nothing queued it succeeds with no
/// slots.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    parameters: ModelParameters,
    script: VecDeque<Outcome>,
    timing: Timing,
    chunk: usize,
    reversed: bool,
    calls: usize,
    debug_calls: usize,
    samples: Vec<f32>,
}

impl ScriptedEngine {
    pub fn new(parameters: ModelParameters) -> Self {
        let samples = vec![0.0; parameters.raw_sample_count()];
        Self {
            parameters,
            script: VecDeque::new(),
            timing: Timing {
                dsp: Duration::from_millis(1),
                classification: Duration::from_millis(4),
            },
            chunk: 64,
            reversed: false,
            calls: 0,
            debug_calls: 0,
            samples,
        }
    }

    /// Queues a successful run producing `slots`.
    pub fn push_detections(
        &mut self,
        slots: impl IntoIterator<Item = RawBoundingBox>,
    ) -> &mut Self {
        self.script
            .push_back(Outcome::Detections(slots.into_iter().collect()));
        self
    }

    /// Queues a failed run returning `code`.
    pub fn push_failure(&mut self, code: i32) -> &mut Self {
        self.script.push_back(Outcome::Failure(EngineStatus(code)));
        self
    }

    /// Timing reported on every successful run.
    pub fn with_timing(mut self, dsp: Duration, classification: Duration) -> Self {
        self.timing = Timing {
            dsp,
            classification,
        };
        self
    }

    /// Number of samples requested per signal read.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Reads signal chunks from the end towards the start.
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Number of completed `run` calls.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of `run` calls made with the debug flag set.
    pub fn debug_calls(&self) -> usize {
        self.debug_calls
    }

    /// Samples read during the last run.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn read_signal(&mut self, signal: &dyn Signal) -> EngineStatus {
        let total = signal.total_length();
        self.samples.resize(total, 0.0);

        let starts: Vec<usize> = (0..total).step_by(self.chunk).collect();
        let order: Box<dyn Iterator<Item = &usize>> = if self.reversed {
            Box::new(starts.iter().rev())
        } else {
            Box::new(starts.iter())
        };

        for &start in order {
            let end = (start + self.chunk).min(total);
            if signal.get_data(start, &mut self.samples[start..end]).is_err() {
                return EngineStatus::DSP_ERROR;
            }
        }

        EngineStatus::OK
    }
}

impl InferenceEngine for ScriptedEngine {
    fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    fn run(
        &mut self,
        signal: &dyn Signal,
        result: &mut ClassificationResult,
        debug: bool,
    ) -> EngineStatus {
        self.calls += 1;
        if debug {
            self.debug_calls += 1;
        }

        let status = self.read_signal(signal);
        if !status.is_ok() {
            return status;
        }

        match self.script.pop_front() {
            Some(Outcome::Failure(status)) => status,
            Some(Outcome::Detections(slots)) => {
                for slot in slots {
                    if !result.push(slot) {
                        break;
                    }
                }
                result.timing = self.timing;
                EngineStatus::OK
            }
            None => {
                result.timing = self.timing;
                EngineStatus::OK
            }
        }
    }
}
