//! RGBA bitmaps and the scaling/cropping used to fit them into a canvas.

use crate::error::{AppError, Result};
use crate::types::Rgba;
use std::path::Path;

/// Integer pixel size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// A row-major RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// A bitmap filled with one color.
    pub fn new(width: usize, height: usize, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Self {
        assert_eq!(pixels.len(), width * height, "pixel count mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build from tightly packed RGBA8 bytes.
    pub fn from_rgba(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::EmptyBitmap);
        }
        if bytes.len() != width * height * 4 {
            return Err(AppError::FrameFormat(format!(
                "RGBA {width}x{height} needs {} bytes, got {}",
                width * height * 4,
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self::from_pixels(width, height, pixels))
    }

    /// Decode an image file and convert it to RGBA8.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path)?.to_rgba8();
        let (w, h) = decoded.dimensions();
        log::info!("decoded {} ({w}x{h})", path.display());
        Self::from_rgba(w as usize, h as usize, decoded.as_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Flat RGBA8 bytes, e.g. for texture upload.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_array()).collect()
    }
}

/// Scales and crops bitmaps to a target size.
pub struct BitmapCalculator;

impl BitmapCalculator {
    /// Resize to exactly `target`, sampling nearest neighbours (no filtering).
    pub fn scale(bitmap: &Bitmap, target: Size) -> Result<Bitmap> {
        if target.is_empty() || bitmap.size().is_empty() {
            return Err(AppError::EmptyBitmap);
        }
        if bitmap.size() == target {
            return Ok(bitmap.clone());
        }
        let mut pixels = Vec::with_capacity(target.width * target.height);
        for ty in 0..target.height {
            let sy = ty * bitmap.height / target.height;
            let row = &bitmap.pixels[sy * bitmap.width..(sy + 1) * bitmap.width];
            for tx in 0..target.width {
                let sx = tx * bitmap.width / target.width;
                pixels.push(row[sx]);
            }
        }
        Ok(Bitmap::from_pixels(target.width, target.height, pixels))
    }

    /// Center thumbnail: scale so the bitmap covers `target`, then cut the
    /// overflow evenly from both sides.
    pub fn crop(bitmap: &Bitmap, target: Size) -> Result<Bitmap> {
        if target.is_empty() || bitmap.size().is_empty() {
            return Err(AppError::EmptyBitmap);
        }
        let sx = target.width as f32 / bitmap.width as f32;
        let sy = target.height as f32 / bitmap.height as f32;
        let cover = sx.max(sy);
        let covered = Size::new(
            ((bitmap.width as f32 * cover).round() as usize).max(target.width),
            ((bitmap.height as f32 * cover).round() as usize).max(target.height),
        );
        let scaled = Self::scale(bitmap, covered)?;

        let left = (covered.width - target.width) / 2;
        let top = (covered.height - target.height) / 2;
        let mut pixels = Vec::with_capacity(target.width * target.height);
        for y in top..top + target.height {
            let start = y * covered.width + left;
            pixels.extend_from_slice(&scaled.pixels[start..start + target.width]);
        }
        Ok(Bitmap::from_pixels(target.width, target.height, pixels))
    }

    /// Fit inside `target` while keeping the aspect ratio: the matching axis
    /// takes the target length and the other one is truncated.
    pub fn inside(bitmap: &Bitmap, target: Size) -> Result<Bitmap> {
        Self::scale(bitmap, Self::inside_size(bitmap.size(), target)?)
    }

    /// The size [`BitmapCalculator::inside`] would produce.
    pub fn inside_size(source: Size, target: Size) -> Result<Size> {
        if target.is_empty() || source.is_empty() {
            return Err(AppError::EmptyBitmap);
        }
        let pic_ratio = source.aspect();
        let canvas_ratio = target.aspect();

        let size = if pic_ratio > canvas_ratio {
            // Wider and shorter than the canvas.
            Size::new(target.width, (target.width as f32 / pic_ratio) as usize)
        } else if pic_ratio < canvas_ratio {
            // Taller and narrower than the canvas.
            Size::new((target.height as f32 * pic_ratio) as usize, target.height)
        } else {
            target
        };
        Ok(Size::new(size.width.max(1), size.height.max(1)))
    }
}
