//! Classification output written by an inference engine.

use std::time::Duration;

/// One raw detection slot as produced by the engine.
///
/// `class_id == 0` marks an empty slot (background).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawBoundingBox {
    pub class_id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RawBoundingBox {
    pub fn new(class_id: u32, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            class_id,
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true for the background sentinel.
    #[inline]
    pub fn is_background(&self) -> bool {
        self.class_id == 0
    }
}

/// Time spent in each engine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    /// Signal processing (reading and transforming samples).
    pub dsp: Duration,
    /// Model evaluation.
    pub classification: Duration,
}

impl Timing {
    #[inline]
    pub fn total(&self) -> Duration {
        self.dsp + self.classification
    }
}

/// Fixed-capacity result of one classifier run.
///
/// Slots are allocated once; [`ClassificationResult::reset`] clears them
/// in place before every run.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Phase timings reported by the engine.
    pub timing: Timing,
    slots: Box<[RawBoundingBox]>,
    len: usize,
}

impl ClassificationResult {
    /// Creates a result with room for `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            timing: Timing::default(),
            slots: vec![RawBoundingBox::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Clears timing and all slots.
    pub fn reset(&mut self) {
        self.timing = Timing::default();
        self.slots.fill(RawBoundingBox::default());
        self.len = 0;
    }

    /// Appends a slot. Returns false when the result is full.
    pub fn push(&mut self, slot: RawBoundingBox) -> bool {
        if self.len == self.slots.len() {
            return false;
        }
        self.slots[self.len] = slot;
        self.len += 1;
        true
    }

    /// Populated slots in engine order, background slots included.
    #[inline]
    pub fn slots(&self) -> &[RawBoundingBox] {
        &self.slots[..self.len]
    }

    /// Number of populated slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut result = ClassificationResult::new(2);
        assert!(result.push(RawBoundingBox::new(1, 0, 0, 8, 8)));
        assert!(result.push(RawBoundingBox::new(0, 0, 0, 0, 0)));
        assert!(result.is_full());
        assert!(!result.push(RawBoundingBox::new(2, 8, 8, 8, 8)));
        assert_eq!(result.len(), 2);
        assert_eq!(result.slots()[0].class_id, 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut result = ClassificationResult::new(3);
        result.push(RawBoundingBox::new(1, 2, 3, 4, 5));
        result.timing.dsp = Duration::from_millis(3);

        result.reset();

        assert!(result.is_empty());
        assert_eq!(result.timing, Timing::default());
        assert_eq!(result.capacity(), 3);
    }

    #[test]
    fn test_timing_total() {
        let timing = Timing {
            dsp: Duration::from_millis(2),
            classification: Duration::from_millis(5),
        };
        assert_eq!(timing.total(), Duration::from_millis(7));
    }
}
