//! Crop-and-resize builder.
//!
//! Maps a frame of arbitrary geometry and pixel format into a fixed
//! `width * height` buffer, either grayscale or RGB888.

use super::{luma, read_rgb, TransformError};
use crate::capture::Frame;

/// How the source geometry is fitted to the target geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Stretch the whole source to the target size, ignoring aspect ratio.
    #[default]
    Squash,
    /// Take the largest centered window with the target aspect ratio.
    CenterCrop,
}

/// Pixel sampling method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
}

/// Source rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Fluent resize transform.
///
/// ```
/// use fomo_vision::capture::Frame;
/// use fomo_vision::transform::Crop;
///
/// let frame = Frame::grayscale(vec![128u8; 64 * 48], 64, 48);
/// let mut out = vec![0u8; 16 * 16 * 3];
///
/// Crop::from(&frame)
///     .to(16, 16)
///     .squash()
///     .rgb(true)
///     .nearest()
///     .apply(&mut out)
///     .unwrap();
///
/// assert!(out.iter().all(|&v| v == 128));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Crop<'a> {
    source: &'a Frame,
    width: u32,
    height: u32,
    policy: ResizePolicy,
    interpolation: Interpolation,
    rgb: bool,
}

impl<'a> From<&'a Frame> for Crop<'a> {
    fn from(source: &'a Frame) -> Self {
        Self {
            source,
            width: source.width(),
            height: source.height(),
            policy: ResizePolicy::default(),
            interpolation: Interpolation::default(),
            rgb: false,
        }
    }
}

impl<'a> Crop<'a> {
    /// Sets the target geometry.
    pub fn to(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn squash(mut self) -> Self {
        self.policy = ResizePolicy::Squash;
        self
    }

    pub fn center_crop(mut self) -> Self {
        self.policy = ResizePolicy::CenterCrop;
        self
    }

    /// Selects RGB888 output when `enabled`, grayscale otherwise.
    pub fn rgb(mut self, enabled: bool) -> Self {
        self.rgb = enabled;
        self
    }

    pub fn gray(self) -> Self {
        self.rgb(false)
    }

    pub fn nearest(mut self) -> Self {
        self.interpolation = Interpolation::Nearest;
        self
    }

    pub fn bilinear(mut self) -> Self {
        self.interpolation = Interpolation::Bilinear;
        self
    }

    /// Number of bytes `apply` will write.
    pub fn output_len(&self) -> usize {
        let channels = if self.rgb { 3 } else { 1 };
        self.width as usize * self.height as usize * channels
    }

    /// Writes the resized frame into `out`.
    ///
    /// `out` must be exactly [`Crop::output_len`] bytes long.
    pub fn apply(self, out: &mut [u8]) -> Result<(), TransformError> {
        if self.source.is_empty() {
            return Err(TransformError::EmptySource);
        }
        if !self.source.is_valid() {
            return Err(TransformError::GeometryMismatch {
                len: self.source.len(),
                width: self.source.width(),
                height: self.source.height(),
                format: self.source.format(),
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(TransformError::InvalidTarget {
                width: self.width,
                height: self.height,
            });
        }
        if out.len() != self.output_len() {
            return Err(TransformError::OutputSize {
                expected: self.output_len(),
                actual: out.len(),
            });
        }

        let window = self.window();
        let channels = if self.rgb { 3 } else { 1 };

        for (y, row) in out
            .chunks_exact_mut(self.width as usize * channels)
            .enumerate()
        {
            for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                let [r, g, b] = match self.interpolation {
                    Interpolation::Nearest => self.sample_nearest(window, x as u32, y as u32),
                    Interpolation::Bilinear => self.sample_bilinear(window, x as u32, y as u32),
                };
                if self.rgb {
                    px.copy_from_slice(&[r, g, b]);
                } else {
                    px[0] = luma(r, g, b);
                }
            }
        }

        Ok(())
    }

    fn window(&self) -> Window {
        let (sw, sh) = (self.source.width(), self.source.height());
        match self.policy {
            ResizePolicy::Squash => Window {
                x: 0,
                y: 0,
                width: sw,
                height: sh,
            },
            ResizePolicy::CenterCrop => {
                let (tw, th) = (self.width as u64, self.height as u64);
                if sw as u64 * th > sh as u64 * tw {
                    // source is wider than the target
                    let width = ((sh as u64 * tw / th) as u32).max(1);
                    Window {
                        x: (sw - width) / 2,
                        y: 0,
                        width,
                        height: sh,
                    }
                } else {
                    let height = ((sw as u64 * th / tw) as u32).max(1);
                    Window {
                        x: 0,
                        y: (sh - height) / 2,
                        width: sw,
                        height,
                    }
                }
            }
        }
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let index = y as usize * self.source.width() as usize + x as usize;
        read_rgb(self.source.pixels(), self.source.format(), index)
    }

    fn sample_nearest(&self, window: Window, x: u32, y: u32) -> [u8; 3] {
        let sx = (x as u64 * window.width as u64 / self.width as u64) as u32;
        let sy = (y as u64 * window.height as u64 / self.height as u64) as u32;
        self.pixel(window.x + sx, window.y + sy)
    }

    fn sample_bilinear(&self, window: Window, x: u32, y: u32) -> [u8; 3] {
        let map = |t: u32, src: u32, dst: u32| -> (u32, u32, f32) {
            let pos = ((t as f32 + 0.5) * src as f32 / dst as f32 - 0.5)
                .clamp(0.0, (src - 1) as f32);
            let lo = pos.floor() as u32;
            let hi = (lo + 1).min(src - 1);
            (lo, hi, pos - lo as f32)
        };
        let (x0, x1, fx) = map(x, window.width, self.width);
        let (y0, y1, fy) = map(y, window.height, self.height);

        let p00 = self.pixel(window.x + x0, window.y + y0);
        let p10 = self.pixel(window.x + x1, window.y + y0);
        let p01 = self.pixel(window.x + x0, window.y + y1);
        let p11 = self.pixel(window.x + x1, window.y + y1);

        let mut out = [0u8; 3];
        for c in 0..3 {
            let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
            let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
            out[c] = (top * (1.0 - fy) + bottom * fy).round() as u8;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelFormat;
    use crate::transform::pack_rgb565;

    fn gradient(width: u32, height: u32) -> Frame {
        let pixels = (0..width * height).map(|i| (i % 256) as u8).collect();
        Frame::grayscale(pixels, width, height)
    }

    #[test]
    fn test_identity_nearest() {
        let frame = gradient(8, 4);
        let mut out = vec![0u8; 32];
        Crop::from(&frame).to(8, 4).nearest().apply(&mut out).unwrap();
        assert_eq!(out, frame.pixels());
    }

    #[test]
    fn test_squash_downscale_picks_top_left_of_block() {
        // 4x4 -> 2x2 takes source pixels (0,0) (2,0) (0,2) (2,2)
        let frame = gradient(4, 4);
        let mut out = vec![0u8; 4];
        Crop::from(&frame).to(2, 2).squash().nearest().apply(&mut out).unwrap();
        assert_eq!(out, vec![0, 2, 8, 10]);
    }

    #[test]
    fn test_squash_ignores_aspect() {
        // 4x1 -> 2x2 stretches the single row vertically
        let frame = Frame::grayscale(vec![1, 2, 3, 4], 4, 1);
        let mut out = vec![0u8; 4];
        Crop::from(&frame).to(2, 2).squash().apply(&mut out).unwrap();
        assert_eq!(out, vec![1, 3, 1, 3]);
    }

    #[test]
    fn test_center_crop_keeps_middle() {
        // 4x2 -> 2x2 keeps columns 1 and 2
        let frame = Frame::grayscale(vec![1, 2, 3, 4, 5, 6, 7, 8], 4, 2);
        let mut out = vec![0u8; 4];
        Crop::from(&frame).to(2, 2).center_crop().apply(&mut out).unwrap();
        assert_eq!(out, vec![2, 3, 6, 7]);
    }

    #[test]
    fn test_gray_to_rgb_replicates() {
        let frame = Frame::grayscale(vec![128u8; 32 * 32], 32, 32);
        let mut out = vec![0u8; 4 * 4 * 3];
        Crop::from(&frame).to(4, 4).rgb(true).apply(&mut out).unwrap();
        assert!(out.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_rgb_to_rgb_preserves_channels() {
        let mut pixels = vec![0u8; 8 * 8 * 3];
        pixels[..3].copy_from_slice(&[10, 20, 30]);
        let frame = Frame::rgb(pixels, 8, 8);
        let mut out = vec![0u8; 8 * 8 * 3];
        Crop::from(&frame).to(8, 8).rgb(true).apply(&mut out).unwrap();
        assert_eq!(&out[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_rgb565_source() {
        let px = pack_rgb565(255, 0, 0);
        let pixels = px.iter().copied().cycle().take(4 * 4 * 2).collect();
        let frame = Frame::new(pixels, 4, 4, PixelFormat::Rgb565, 0);
        let mut out = vec![0u8; 2 * 2 * 3];
        Crop::from(&frame).to(2, 2).rgb(true).apply(&mut out).unwrap();
        assert_eq!(&out[..3], &[255, 0, 0]);
    }

    #[test]
    fn test_bilinear_blends() {
        let frame = Frame::grayscale(vec![0, 200], 2, 1);
        let mut out = vec![0u8; 3];
        Crop::from(&frame).to(3, 1).bilinear().apply(&mut out).unwrap();
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 100);
        assert_eq!(out[2], 200);
    }

    #[test]
    fn test_errors() {
        let empty = Frame::empty();
        let mut out = vec![0u8; 4];
        assert!(matches!(
            Crop::from(&empty).to(2, 2).apply(&mut out),
            Err(TransformError::EmptySource)
        ));

        let broken = Frame::rgb(vec![0u8; 5], 2, 2);
        assert!(matches!(
            Crop::from(&broken).to(2, 2).apply(&mut out),
            Err(TransformError::GeometryMismatch { .. })
        ));

        let frame = gradient(4, 4);
        assert!(matches!(
            Crop::from(&frame).to(0, 2).apply(&mut out),
            Err(TransformError::InvalidTarget { .. })
        ));
        assert!(matches!(
            Crop::from(&frame).to(2, 2).rgb(true).apply(&mut out),
            Err(TransformError::OutputSize {
                expected: 12,
                actual: 4
            })
        ));
    }
}
