//! Bounding box value type.

use crate::inference::RawBoundingBox;

/// One detected object, in model input coordinates.
///
/// Boxes handed out by the detector never carry class id 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub class_id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(class_id: u32, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            class_id,
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_background(&self) -> bool {
        self.class_id == 0
    }

    #[inline]
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Center point, rounded down.
    #[inline]
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Maps the box from a `from` (width, height) space into a `to` space,
    /// e.g. from model input coordinates back to the captured frame.
    pub fn scaled(&self, from: (u32, u32), to: (u32, u32)) -> Self {
        let sx = |v: u32| (v as u64 * to.0 as u64 / from.0.max(1) as u64) as u32;
        let sy = |v: u32| (v as u64 * to.1 as u64 / from.1.max(1) as u64) as u32;
        Self {
            class_id: self.class_id,
            x: sx(self.x),
            y: sy(self.y),
            width: sx(self.width),
            height: sy(self.height),
        }
    }
}

impl From<RawBoundingBox> for BoundingBox {
    fn from(raw: RawBoundingBox) -> Self {
        Self::new(raw.class_id, raw.x, raw.y, raw.width, raw.height)
    }
}

impl From<&RawBoundingBox> for BoundingBox {
    fn from(raw: &RawBoundingBox) -> Self {
        Self::from(*raw)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "class {} at ({}, {}) {}x{}",
            self.class_id, self.x, self.y, self.width, self.height
        )
    }
}
