//! Lazy sample access for the inference engine.
//!
//! The engine's preprocessing stage does not take a tensor. It pulls
//! samples through a [`Signal`] in whatever chunks and order it likes,
//! so the model input never has to be expanded into a full float copy.

mod adapter;

pub use adapter::FrameSignal;

use thiserror::Error;

/// Errors a signal source can report to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal read failed with code {0}")]
    ReadFailed(i32),
}

/// Pull-based sample source consumed by an inference engine.
pub trait Signal {
    /// Total number of samples the signal can produce.
    fn total_length(&self) -> usize;

    /// Writes `out.len()` samples starting at sample `offset` into `out`.
    ///
    /// Callers must keep `offset + out.len() <= total_length()`.
    fn get_data(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError>;
}

/// Packs an RGB triple into the low 24 bits of a sample.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a packed sample back into its RGB triple.
#[inline]
pub fn unpack_rgb(sample: f32) -> [u8; 3] {
    let v = sample as u32;
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}
