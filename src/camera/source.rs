//! Frame sources: an animated test pattern and raw I420 capture playback.

use crate::camera::FrameSource;
use crate::engine::picker::hsv_to_rgb;
use crate::engine::yuv::{YuvFrame, chroma_size, i420_frame_len, rgb_to_yuv};
use crate::error::{AppError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

// ── Synthetic ──────────────────────────────────────────────────────────────────

/// Animated hue sweep with a little sensor noise, emitted as I420.
pub struct SyntheticSource {
    width: usize,
    height: usize,
    frame_index: u64,
    /// Maximum absolute luma noise added per pixel.
    noise: u8,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_noise(width, height, 3)
    }

    pub fn with_noise(width: usize, height: usize, noise: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::CameraBinding(format!(
                "synthetic source needs a non-empty size, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_index: 0,
            noise,
            rng: StdRng::seed_from_u64(0x5eed),
        })
    }

    /// Hue in degrees shown at column `x` of frame `frame_index`.
    fn hue_at(&self, x: usize) -> f32 {
        let sweep = (self.frame_index as f32 * 2.0) % 360.0;
        (sweep + 360.0 * x as f32 / self.width as f32) % 360.0
    }

    fn render(&mut self) -> Result<YuvFrame> {
        let (w, h) = (self.width, self.height);
        let (cw, ch) = chroma_size(w, h);
        let mut bytes = vec![0u8; i420_frame_len(w, h)];
        let (y_plane, chroma) = bytes.split_at_mut(w * h);
        let (u_plane, v_plane) = chroma.split_at_mut(cw * ch);

        for x in 0..w {
            let [r, g, b] = hsv_to_rgb(self.hue_at(x), 0.8, 0.9);
            let (yy, u, v) = rgb_to_yuv(r, g, b);
            for y in 0..h {
                let noisy = if self.noise == 0 {
                    yy
                } else {
                    let n = self.noise as i16;
                    (yy as i16 + self.rng.random_range(-n..=n)).clamp(0, 255) as u8
                };
                y_plane[y * w + x] = noisy;
            }
            if x % 2 == 0 {
                for cy in 0..ch {
                    u_plane[cy * cw + x / 2] = u;
                    v_plane[cy * cw + x / 2] = v;
                }
            }
        }
        self.frame_index += 1;
        YuvFrame::from_i420(w, h, &bytes)
    }
}

impl FrameSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("synthetic {}x{}", self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<YuvFrame>> {
        self.render().map(Some)
    }
}

// ── Raw file playback ──────────────────────────────────────────────────────────

/// Plays back consecutive tightly packed I420 frames from a file, looping at
/// the end. A trailing partial frame is ignored.
pub struct RawFileSource {
    path: PathBuf,
    width: usize,
    height: usize,
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl RawFileSource {
    pub fn open(path: &Path, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::CameraBinding(format!(
                "raw source needs a non-empty size, got {width}x{height}"
            )));
        }
        let file = File::open(path)
            .map_err(|e| AppError::CameraBinding(format!("{}: {e}", path.display())))?;
        let frame_len = i420_frame_len(width, height);
        let file_len = file.metadata()?.len();
        if file_len < frame_len as u64 {
            return Err(AppError::CameraBinding(format!(
                "{} holds {file_len} bytes, one {width}x{height} frame needs {frame_len}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            reader: BufReader::new(file),
            buf: vec![0; frame_len],
        })
    }
}

impl FrameSource for RawFileSource {
    fn describe(&self) -> String {
        format!("{} ({}x{})", self.path.display(), self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<YuvFrame>> {
        match self.reader.read_exact(&mut self.buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                log::debug!("{}: end of capture, rewinding", self.path.display());
                self.reader.seek(SeekFrom::Start(0))?;
                self.reader.read_exact(&mut self.buf)?;
            }
            Err(e) => return Err(e.into()),
        }
        YuvFrame::from_i420(self.width, self.height, &self.buf).map(Some)
    }
}
