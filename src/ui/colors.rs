//! Shared UI colors and conversions from engine color types.

use crate::engine::picker::hsv_to_rgb;
use crate::types::Rgba;
use eframe::egui::Color32;
use once_cell::sync::Lazy;

/// Background behind the image and the camera preview.
pub const CANVAS_BACKGROUND: Color32 = Color32::from_rgb(64, 64, 64);

/// Hue strip shown while no image or camera frame is available yet.
pub static HUE_STRIP: Lazy<Vec<Color32>> = Lazy::new(|| {
    (0..36)
        .map(|i| {
            let [r, g, b] = hsv_to_rgb(i as f32 * 10.0, 0.8, 0.9);
            Color32::from_rgb(r, g, b)
        })
        .collect()
});

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Text and ring color readable on top of a light or dark color.
pub fn contrast(is_light: bool) -> Color32 {
    if is_light {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
