//! YUV 4:2:0 camera frames and YUV→RGB conversion.
//!
//! Frames follow the three-plane `YUV_420_888` model: one full-resolution luma
//! plane and two chroma planes subsampled by two in both axes. Every plane has
//! its own row and pixel stride, so planar (I420) and interleaved (NV12/NV21)
//! buffers are both expressible without copying into a canonical layout.

use crate::config::LIGHT_THRESHOLD;
use crate::engine::bitmap::Bitmap;
use crate::error::{AppError, Result};
use crate::types::{ColorSample, Rgba};

// BT.601 full-range coefficients, U and V centered on 128.
const R_FROM_V: f64 = 1.370705;
const G_FROM_V: f64 = 0.698001;
const G_FROM_U: f64 = 0.337633;
const B_FROM_U: f64 = 1.732446;

/// One plane of a YUV frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    pub data: Vec<u8>,
    /// Bytes between the starts of two consecutive rows.
    pub row_stride: usize,
    /// Bytes between two horizontally adjacent samples.
    pub pixel_stride: usize,
}

impl Plane {
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        row * self.row_stride + col * self.pixel_stride
    }

    #[inline]
    fn at(&self, col: usize, row: usize) -> u8 {
        self.data[self.index(col, row)]
    }

    /// Ensure a `cols × rows` sample grid is addressable.
    fn check(&self, name: &str, cols: usize, rows: usize) -> Result<()> {
        if self.pixel_stride == 0 {
            return Err(AppError::FrameFormat(format!("{name} plane has zero pixel stride")));
        }
        let last = self.index(cols - 1, rows - 1);
        if last >= self.data.len() {
            return Err(AppError::FrameFormat(format!(
                "{name} plane too short: needs index {last}, has {} bytes",
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// A validated YUV 4:2:0 frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YuvFrame {
    width: usize,
    height: usize,
    y: Plane,
    u: Plane,
    v: Plane,
}

impl YuvFrame {
    /// Build a frame from its planes, checking that every addressed sample
    /// lies inside its plane buffer.
    pub fn new(width: usize, height: usize, y: Plane, u: Plane, v: Plane) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::FrameFormat(format!(
                "empty frame {width}x{height}"
            )));
        }
        let (cw, ch) = chroma_size(width, height);
        y.check("Y", width, height)?;
        u.check("U", cw, ch)?;
        v.check("V", cw, ch)?;
        Ok(Self {
            width,
            height,
            y,
            u,
            v,
        })
    }

    /// Tightly packed planar I420: Y, then U, then V.
    pub fn from_i420(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let (cw, ch) = chroma_size(width, height);
        let y_len = width * height;
        let c_len = cw * ch;
        if bytes.len() < i420_frame_len(width, height) {
            return Err(AppError::FrameFormat(format!(
                "I420 {width}x{height} needs {} bytes, got {}",
                i420_frame_len(width, height),
                bytes.len()
            )));
        }
        let y = Plane::new(bytes[..y_len].to_vec(), width, 1);
        let u = Plane::new(bytes[y_len..y_len + c_len].to_vec(), cw, 1);
        let v = Plane::new(bytes[y_len + c_len..y_len + 2 * c_len].to_vec(), cw, 1);
        Self::new(width, height, y, u, v)
    }

    /// Semi-planar NV12: Y, then interleaved U/V pairs.
    pub fn from_nv12(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let (cw, ch) = chroma_size(width, height);
        let y_len = width * height;
        let uv_len = 2 * cw * ch;
        if bytes.len() < y_len + uv_len {
            return Err(AppError::FrameFormat(format!(
                "NV12 {width}x{height} needs {} bytes, got {}",
                y_len + uv_len,
                bytes.len()
            )));
        }
        let uv = &bytes[y_len..y_len + uv_len];
        let y = Plane::new(bytes[..y_len].to_vec(), width, 1);
        let u = Plane::new(uv.to_vec(), 2 * cw, 2);
        let v = Plane::new(uv[1..].to_vec(), 2 * cw, 2);
        Self::new(width, height, y, u, v)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw `(Y, U, V)` at pixel `(x, y)`. Chroma is read at `(x/2, y/2)`.
    ///
    /// Panics if the coordinate is outside the frame.
    pub fn yuv_at(&self, x: usize, y: usize) -> (u8, u8, u8) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside frame");
        (
            self.y.at(x, y),
            self.u.at(x / 2, y / 2),
            self.v.at(x / 2, y / 2),
        )
    }

    /// `(Y, U, V)` of the viewfinder center.
    pub fn center_yuv(&self) -> (u8, u8, u8) {
        self.yuv_at(self.width / 2, self.height / 2)
    }

    pub fn rgb_at(&self, x: usize, y: usize) -> Rgba {
        let (yy, u, v) = self.yuv_at(x, y);
        let [r, g, b] = yuv_to_rgb(yy, u, v);
        Rgba::opaque(r, g, b)
    }

    /// Color of the center pixel. Lightness is judged on luma alone.
    pub fn sample_center(&self) -> ColorSample {
        let (yy, u, v) = self.center_yuv();
        let [r, g, b] = yuv_to_rgb(yy, u, v);
        ColorSample {
            color: Rgba::opaque(r, g, b),
            is_light: yy >= LIGHT_THRESHOLD,
        }
    }

    /// Convert the whole frame for display.
    pub fn to_bitmap(&self) -> Bitmap {
        let mut pixels = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(self.rgb_at(x, y));
            }
        }
        Bitmap::from_pixels(self.width, self.height, pixels)
    }
}

/// Chroma plane dimensions for a 4:2:0 frame.
pub fn chroma_size(width: usize, height: usize) -> (usize, usize) {
    (width.div_ceil(2), height.div_ceil(2))
}

/// Byte length of one tightly packed I420 frame.
pub fn i420_frame_len(width: usize, height: usize) -> usize {
    let (cw, ch) = chroma_size(width, height);
    width * height + 2 * cw * ch
}

/// Convert one YUV sample to RGB. Each channel is truncated toward zero and
/// then clamped to `0..=255`.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f64;
    let u = u as f64 - 128.0;
    let v = v as f64 - 128.0;

    let r = (y + R_FROM_V * v) as i32;
    let g = (y - G_FROM_V * v - G_FROM_U * u) as i32;
    let b = (y + B_FROM_U * u) as i32;

    [clamp_channel(r), clamp_channel(g), clamp_channel(b)]
}

#[inline]
fn clamp_channel(c: i32) -> u8 {
    c.clamp(0, 255) as u8
}

/// Encode one RGB pixel as YUV; the inverse of [`yuv_to_rgb`] up to rounding.
/// Used to synthesise frames.
pub fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = (b - y) / B_FROM_U + 128.0;
    let v = (r - y) / R_FROM_V + 128.0;
    let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
    (q(y), q(u), q(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A frame where every pixel has the same Y/U/V.
    fn uniform_i420(width: usize, height: usize, y: u8, u: u8, v: u8) -> YuvFrame {
        let (cw, ch) = chroma_size(width, height);
        let mut bytes = vec![y; width * height];
        bytes.extend(std::iter::repeat_n(u, cw * ch));
        bytes.extend(std::iter::repeat_n(v, cw * ch));
        YuvFrame::from_i420(width, height, &bytes).unwrap()
    }

    #[test]
    fn neutral_chroma_is_gray() {
        assert_eq!(yuv_to_rgb(0, 128, 128), [0, 0, 0]);
        assert_eq!(yuv_to_rgb(100, 128, 128), [100, 100, 100]);
        assert_eq!(yuv_to_rgb(255, 128, 128), [255, 255, 255]);
    }

    #[test]
    fn conversion_truncates_toward_zero() {
        // R = 100 + 1.370705 * 10 = 113.7 -> 113
        // G = 100 - 6.98001 - 0 = 93.02 -> 93
        assert_eq!(yuv_to_rgb(100, 128, 138), [113, 93, 100]);
    }

    #[test]
    fn out_of_gamut_values_are_clamped() {
        assert_eq!(yuv_to_rgb(255, 128, 255)[0], 255);
        assert_eq!(yuv_to_rgb(0, 128, 0)[0], 0);
        assert_eq!(yuv_to_rgb(0, 0, 128)[2], 0);
        assert_eq!(yuv_to_rgb(255, 255, 128)[2], 255);
    }

    #[test]
    fn rgb_to_yuv_is_close_to_inverse() {
        for &(r, g, b) in &[(200u8, 30u8, 60u8), (10, 220, 40), (90, 90, 250)] {
            let (y, u, v) = rgb_to_yuv(r, g, b);
            let [r2, g2, b2] = yuv_to_rgb(y, u, v);
            assert!((r as i32 - r2 as i32).abs() <= 3, "r {r} vs {r2}");
            assert!((g as i32 - g2 as i32).abs() <= 3, "g {g} vs {g2}");
            assert!((b as i32 - b2 as i32).abs() <= 3, "b {b} vs {b2}");
        }
    }

    #[test]
    fn center_sample_reads_center_and_flags_light_by_luma() {
        let frame = uniform_i420(8, 6, 200, 128, 128);
        let sample = frame.sample_center();
        assert_eq!(sample.color, Rgba::opaque(200, 200, 200));
        assert!(sample.is_light);

        let frame = uniform_i420(8, 6, 191, 128, 128);
        assert!(!frame.sample_center().is_light);
    }

    #[test]
    fn center_uses_subsampled_chroma_position() {
        // 4x4 frame; chroma is 2x2. Only the chroma sample at (1,1) is red-ish.
        let mut bytes = vec![100u8; 16];
        bytes.extend([128, 128, 128, 128]); // U
        bytes.extend([128, 128, 128, 200]); // V
        let frame = YuvFrame::from_i420(4, 4, &bytes).unwrap();
        assert_eq!(frame.center_yuv(), (100, 128, 200));
        assert_eq!(frame.yuv_at(0, 0), (100, 128, 128));
        assert!(frame.sample_center().color.r > 150);
    }

    #[test]
    fn padded_row_strides_are_honoured() {
        // 2x2 frame with 4-byte luma rows; padding bytes must never be read.
        let y = Plane::new(vec![10, 20, 99, 99, 30, 40, 99, 99], 4, 1);
        let u = Plane::new(vec![128], 1, 1);
        let v = Plane::new(vec![128], 1, 1);
        let frame = YuvFrame::new(2, 2, y, u, v).unwrap();
        assert_eq!(frame.yuv_at(1, 1).0, 40);
        assert_eq!(frame.center_yuv().0, 40);
    }

    #[test]
    fn nv12_interleaved_chroma() {
        let mut bytes = vec![50u8; 4];
        bytes.extend([90, 170]); // U, V
        let frame = YuvFrame::from_nv12(2, 2, &bytes).unwrap();
        assert_eq!(frame.yuv_at(0, 0), (50, 90, 170));
    }

    #[test]
    fn odd_dimensions_round_chroma_up() {
        assert_eq!(chroma_size(5, 3), (3, 2));
        assert_eq!(i420_frame_len(5, 3), 15 + 12);
        let frame = uniform_i420(5, 3, 60, 128, 128);
        assert_eq!(frame.rgb_at(4, 2), Rgba::opaque(60, 60, 60));
    }

    #[test]
    fn short_planes_are_rejected() {
        let y = Plane::new(vec![0; 3], 2, 1);
        let u = Plane::new(vec![128], 1, 1);
        let v = Plane::new(vec![128], 1, 1);
        assert!(matches!(
            YuvFrame::new(2, 2, y, u, v),
            Err(AppError::FrameFormat(_))
        ));
        assert!(YuvFrame::from_i420(4, 4, &[0; 10]).is_err());
        assert!(YuvFrame::from_i420(0, 4, &[]).is_err());
    }

    #[test]
    fn to_bitmap_converts_every_pixel() {
        let frame = uniform_i420(3, 2, 0, 128, 128);
        let bitmap = frame.to_bitmap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.get_pixel(2, 1), Some(Rgba::BLACK));
    }
}
