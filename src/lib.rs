//! Camera and image color picker: YUV frame sampling, bitmap fitting and
//! pointer-to-pixel mapping, with an egui front end.

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod types;
pub mod ui;
