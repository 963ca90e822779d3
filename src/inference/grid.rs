//! Luminance grid engine.
//!
//! A small CPU stand-in for a FOMO model: the input is divided into
//! square cells and every cell whose mean luminance exceeds a threshold
//! is reported as one object of class 1. Like FOMO, the output is a
//! coarse grid of cell-sized boxes rather than tight boxes.

use std::time::Instant;

use super::{
    ClassificationResult, EngineStatus, InferenceEngine, ModelParameters, RawBoundingBox,
};
use crate::capture::DetectorConfig;
use crate::signal::{unpack_rgb, Signal};
use crate::transform::luma;

/// Threshold-per-cell engine.
///
/// Scratch buffers are sized once at construction.
#[derive(Debug, Clone)]
pub struct GridEngine {
    parameters: ModelParameters,
    cell_size: u32,
    threshold: u8,
    row: Vec<f32>,
    cell_sums: Vec<u32>,
}

impl GridEngine {
    pub fn new(parameters: ModelParameters, cell_size: u32, threshold: u8) -> Self {
        let cell_size = cell_size.max(1);
        let cols = parameters.input_width().div_ceil(cell_size) as usize;
        let rows = parameters.input_height().div_ceil(cell_size) as usize;
        Self {
            row: vec![0.0; parameters.input_width() as usize],
            cell_sums: vec![0; cols * rows],
            parameters,
            cell_size,
            threshold,
        }
    }

    /// Builds an engine from the `[detector]` configuration section.
    pub fn from_config(config: &DetectorConfig) -> Self {
        let parameters = if config.color {
            ModelParameters::rgb(config.input_width, config.input_height)
        } else {
            ModelParameters::grayscale(config.input_width, config.input_height)
        };
        let parameters = parameters
            .with_max_detections(config.max_detections)
            .with_labels(["object"]);
        Self::new(parameters, config.grid_cell_size, config.grid_threshold)
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    fn columns(&self) -> u32 {
        self.parameters.input_width().div_ceil(self.cell_size)
    }

    /// Pixel count of the cell at grid position (col, row).
    fn cell_area(&self, col: u32, row: u32) -> u32 {
        let (width, height) = self.cell_extent(col, row);
        width * height
    }

    fn cell_extent(&self, col: u32, row: u32) -> (u32, u32) {
        let x = col * self.cell_size;
        let y = row * self.cell_size;
        let width = self.cell_size.min(self.parameters.input_width() - x);
        let height = self.cell_size.min(self.parameters.input_height() - y);
        (width, height)
    }

    /// Streams the signal one input row at a time into per-cell sums.
    fn accumulate(&mut self, signal: &dyn Signal, debug: bool) -> EngineStatus {
        let width = self.parameters.input_width() as usize;
        let height = self.parameters.input_height() as usize;
        if signal.total_length() != width * height {
            return EngineStatus::SHAPES_DONT_MATCH;
        }

        let columns = self.columns() as usize;
        let cell = self.cell_size as usize;
        self.cell_sums.fill(0);

        for y in 0..height {
            if signal.get_data(y * width, &mut self.row).is_err() {
                return EngineStatus::DSP_ERROR;
            }
            let base = (y / cell) * columns;
            for (x, &sample) in self.row.iter().enumerate() {
                let [r, g, b] = unpack_rgb(sample);
                self.cell_sums[base + x / cell] += luma(r, g, b) as u32;
            }
            if debug {
                tracing::trace!(row = y, "grid engine read row");
            }
        }

        EngineStatus::OK
    }
}

impl InferenceEngine for GridEngine {
    fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    fn run(
        &mut self,
        signal: &dyn Signal,
        result: &mut ClassificationResult,
        debug: bool,
    ) -> EngineStatus {
        let started = Instant::now();
        let status = self.accumulate(signal, debug);
        if !status.is_ok() {
            return status;
        }
        result.timing.dsp = started.elapsed();

        let started = Instant::now();
        let columns = self.columns();
        let mut dropped = 0usize;

        for (index, &sum) in self.cell_sums.iter().enumerate() {
            let col = index as u32 % columns;
            let row = index as u32 / columns;
            let mean = sum / self.cell_area(col, row);
            if mean <= self.threshold as u32 {
                continue;
            }

            let (width, height) = self.cell_extent(col, row);
            let slot = RawBoundingBox::new(
                1,
                col * self.cell_size,
                row * self.cell_size,
                width,
                height,
            );
            if !result.push(slot) {
                dropped += 1;
            }

            if debug {
                tracing::debug!(col, row, mean, "grid cell above threshold");
            }
        }
        result.timing.classification = started.elapsed();

        if dropped > 0 {
            tracing::debug!(dropped, capacity = result.capacity(), "result full, cells dropped");
        }

        EngineStatus::OK
    }
}
