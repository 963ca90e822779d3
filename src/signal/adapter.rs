//! Signal view over the detector's model input buffer.

use super::{pack_rgb, Signal, SignalError};

/// Produces packed-RGB samples from a resampled model input buffer.
///
/// In color mode every sample reads three consecutive bytes (R, G, B).
/// In grayscale mode every sample reads one byte and replicates it into
/// all three channels. Samples are exact integers stored as `f32`.
#[derive(Debug, Clone, Copy)]
pub struct FrameSignal<'a> {
    input: &'a [u8],
    total_length: usize,
    is_color: bool,
}

impl<'a> FrameSignal<'a> {
    /// Creates a signal of `total_length` samples over `input`.
    pub fn new(input: &'a [u8], total_length: usize, is_color: bool) -> Self {
        Self {
            input,
            total_length,
            is_color,
        }
    }

    #[inline]
    pub fn is_color(&self) -> bool {
        self.is_color
    }
}

impl Signal for FrameSignal<'_> {
    fn total_length(&self) -> usize {
        self.total_length
    }

    /// Never fails. Ranges are not checked against `total_length`; a read
    /// past the end of the input buffer panics on slice indexing.
    fn get_data(&self, offset: usize, out: &mut [f32]) -> Result<(), SignalError> {
        let length = out.len();

        if self.is_color {
            let src = &self.input[offset * 3..(offset + length) * 3];
            for (sample, px) in out.iter_mut().zip(src.chunks_exact(3)) {
                *sample = pack_rgb(px[0], px[1], px[2]) as f32;
            }
        } else {
            let src = &self.input[offset..offset + length];
            for (sample, &gray) in out.iter_mut().zip(src) {
                *sample = pack_rgb(gray, gray, gray) as f32;
            }
        }

        Ok(())
    }
}
