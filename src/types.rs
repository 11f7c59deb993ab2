//! Shared color data-model types for the camera analyzer and the image picker.
//!
//! Two notifications travel from the engine to the UI:
//!
//! * **`ColorSample`**: emitted by the camera analyzer. Its `is_light` flag is
//!   derived from the luma channel of the frame, not from the RGB result.
//! * **`ColorEnvelope`**: emitted by the image picker. Carries the hex code and
//!   whether the selection was made by the user or programmatically.

use crate::config::LIGHT_THRESHOLD;
use serde::{Deserialize, Serialize};

// ── Rgba ───────────────────────────────────────────────────────────────────────

/// An 8-bit straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// All channels zero. Pixels equal to this are never picked.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_array(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Packed `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// `#RRGGBB`, zero padded, uppercase.
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `AARRGGBB` without a leading `#`.
    pub fn hex_code(self) -> String {
        format!("{:08X}", self.to_argb())
    }

    /// ITU-R BT.601 weighted gray level in `0.0..=255.0`.
    pub fn gray_level(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// Whether dark text/ring should be drawn over this color.
    pub fn is_light(self) -> bool {
        self.gray_level() >= LIGHT_THRESHOLD as f64
    }
}

// ── Camera sample ──────────────────────────────────────────────────────────────

/// Color of the viewfinder center, produced by the frame analyzer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorSample {
    pub color: Rgba,
    /// `true` when the sampled luma is at or above the light threshold.
    pub is_light: bool,
}

impl ColorSample {
    pub fn hex(&self) -> String {
        self.color.hex()
    }
}

// ── Picker envelope ────────────────────────────────────────────────────────────

/// A color picked from the image palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEnvelope {
    pub color: Rgba,
    /// `AARRGGBB`.
    pub hex_code: String,
    pub from_user: bool,
    pub is_light: bool,
}

impl ColorEnvelope {
    pub fn new(color: Rgba, from_user: bool) -> Self {
        Self {
            color,
            hex_code: color.hex_code(),
            from_user,
            is_light: color.is_light(),
        }
    }

    /// `#RRGGBB`, the form shown in the result bar and copied to the clipboard.
    pub fn hex(&self) -> String {
        self.color.hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_zero_padded_and_uppercase() {
        assert_eq!(Rgba::opaque(10, 11, 12).hex(), "#0A0B0C");
        assert_eq!(Rgba::opaque(255, 0, 128).hex(), "#FF0080");
    }

    #[test]
    fn hex_code_includes_alpha() {
        assert_eq!(Rgba::opaque(1, 2, 3).hex_code(), "FF010203");
        assert_eq!(Rgba::TRANSPARENT.hex_code(), "00000000");
    }

    #[test]
    fn light_threshold_uses_weighted_gray() {
        assert!(Rgba::WHITE.is_light());
        assert!(!Rgba::BLACK.is_light());
        // Pure yellow: 0.299*255 + 0.587*255 = 225.9
        assert!(Rgba::opaque(255, 255, 0).is_light());
        // Pure green: 149.7
        assert!(!Rgba::opaque(0, 255, 0).is_light());
        // Exactly on the threshold counts as light.
        assert!(Rgba::opaque(192, 192, 192).is_light());
    }

    #[test]
    fn envelope_derives_fields_from_color() {
        let env = ColorEnvelope::new(Rgba::opaque(0x12, 0x34, 0x56), true);
        assert_eq!(env.hex_code, "FF123456");
        assert_eq!(env.hex(), "#123456");
        assert!(env.from_user);
        assert!(!env.is_light);
    }
}
