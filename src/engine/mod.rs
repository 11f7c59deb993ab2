//! Engine sub-modules: YUV frames, camera analysis, bitmaps, placement and the image picker.

pub mod analyzer;
pub mod bitmap;
pub mod picker;
pub mod placement;
pub mod yuv;
