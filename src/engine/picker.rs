//! Image color picker: palette fitting, pointer selection and debounced
//! change notifications.
//!
//! The controller moves through three states:
//!
//! 1. **unmeasured**: no canvas size yet; a palette cannot be set.
//! 2. **measured**: canvas known, no palette; selections are ignored.
//! 3. **active**: palette fitted and placed; pointer events select pixels.
//!
//! Notifications are queued as [`ColorEnvelope`]s and drained by the view with
//! [`ColorPickerController::take_envelopes`]. With a non-zero debounce, user
//! selections are held back until no newer selection arrived for the debounce
//! duration; [`ColorPickerController::poll`] releases them.

use crate::engine::bitmap::{Bitmap, BitmapCalculator, Size};
use crate::engine::placement::{Placement, Point};
use crate::error::{AppError, Result};
use crate::types::{ColorEnvelope, Rgba};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub struct ColorPickerController {
    canvas_size: Option<Size>,
    /// Original bitmap, kept so the palette can be refitted on resize.
    source: Option<Bitmap>,
    /// Fitted bitmap that pixels are read from.
    palette: Option<Bitmap>,
    placement: Option<Placement>,

    /// Selected position in fractional palette coordinates.
    selected_image_point: Point,
    selected_color: Rgba,
    pure_selected_color: Rgba,

    debounce: Duration,
    pending: Option<(Instant, ColorEnvelope)>,
    envelopes: VecDeque<ColorEnvelope>,

    /// Bumped whenever the palette bitmap changes.
    revise_tick: u64,
    wheel_radius: f32,
}

impl Default for ColorPickerController {
    fn default() -> Self {
        Self::new(Duration::ZERO, 30.0)
    }
}

impl ColorPickerController {
    pub fn new(debounce: Duration, wheel_radius: f32) -> Self {
        Self {
            canvas_size: None,
            source: None,
            palette: None,
            placement: None,
            selected_image_point: Point::default(),
            selected_color: Rgba::TRANSPARENT,
            pure_selected_color: Rgba::TRANSPARENT,
            debounce,
            pending: None,
            envelopes: VecDeque::new(),
            revise_tick: 0,
            wheel_radius: wheel_radius.max(1.0),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn canvas_size(&self) -> Option<Size> {
        self.canvas_size
    }

    pub fn palette(&self) -> Option<&Bitmap> {
        self.palette.as_ref()
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn revise_tick(&self) -> u64 {
        self.revise_tick
    }

    pub fn wheel_radius(&self) -> f32 {
        self.wheel_radius
    }

    pub fn set_wheel_radius(&mut self, radius: f32) {
        self.wheel_radius = radius.max(1.0);
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Selected color after HSV factors are applied.
    pub fn selected_color(&self) -> Rgba {
        self.selected_color
    }

    /// Selected color exactly as read from the palette.
    pub fn pure_selected_color(&self) -> Rgba {
        self.pure_selected_color
    }

    /// Canvas position of the selector ring, if a palette is active.
    pub fn selected_point(&self) -> Option<Point> {
        self.placement
            .as_ref()
            .map(|p| p.to_screen(self.selected_image_point))
    }

    /// Deadline of the held-back notification, if any.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    // ── Canvas & palette ───────────────────────────────────────────────────

    /// Record the measured canvas size. Zero sizes are ignored. A size change
    /// refits an active palette and re-selects its center.
    pub fn set_canvas_size(&mut self, size: Size, now: Instant) {
        if size.is_empty() || self.canvas_size == Some(size) {
            return;
        }
        self.canvas_size = Some(size);
        if self.source.is_some() {
            if let Err(e) = self.fit_source() {
                log::warn!("picker: refit after resize failed: {e}");
                return;
            }
            self.select_center(false, now);
        }
    }

    /// Fit `bitmap` into the canvas and select its center.
    pub fn set_palette_bitmap(&mut self, bitmap: Bitmap, now: Instant) -> Result<()> {
        if self.canvas_size.is_none() {
            return Err(AppError::CanvasNotMeasured);
        }
        if bitmap.size().is_empty() {
            return Err(AppError::EmptyBitmap);
        }
        self.source = Some(bitmap);
        self.pending = None;
        self.fit_source()?;
        self.select_center(false, now);
        Ok(())
    }

    fn fit_source(&mut self) -> Result<()> {
        let (Some(canvas), Some(source)) = (self.canvas_size, self.source.as_ref()) else {
            return Ok(());
        };
        let fitted = BitmapCalculator::inside(source, canvas)?;
        log::debug!(
            "picker: canvas {}x{}, palette {}x{}",
            canvas.width,
            canvas.height,
            fitted.width(),
            fitted.height()
        );
        self.placement = Some(Placement::new(canvas, fitted.size()));
        self.palette = Some(fitted);
        self.revise_tick += 1;
        Ok(())
    }

    /// Drop every bitmap and pending notification.
    pub fn release(&mut self) {
        self.source = None;
        self.palette = None;
        self.placement = None;
        self.pending = None;
        self.envelopes.clear();
        self.selected_color = Rgba::TRANSPARENT;
        self.pure_selected_color = Rgba::TRANSPARENT;
        self.revise_tick += 1;
    }

    // ── View transform ─────────────────────────────────────────────────────

    pub fn zoom_by(&mut self, factor: f32, max_zoom: f32) {
        if let Some(placement) = self.placement.as_mut() {
            placement.zoom_by(factor, max_zoom);
        }
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if let Some(placement) = self.placement.as_mut() {
            placement.pan_by(dx, dy);
        }
    }

    pub fn reset_view(&mut self) {
        if let Some(placement) = self.placement.as_mut() {
            placement.reset_view();
        }
    }

    // ── Selection ──────────────────────────────────────────────────────────

    /// Select the pixel under canvas point `point`. Returns `false` when the
    /// point is off the image, the pixel is fully transparent, or no palette
    /// is active.
    pub fn select_by_coordinate(&mut self, point: Point, from_user: bool, now: Instant) -> bool {
        let (Some(placement), Some(palette)) = (self.placement.as_ref(), self.palette.as_ref())
        else {
            return false;
        };
        let Some((x, y)) = placement.to_bitmap(point) else {
            return false;
        };
        let Some(pixel) = palette.get_pixel(x, y) else {
            return false;
        };
        let image_point = placement.to_image(point);
        self.apply_selection(pixel, image_point, from_user, now)
    }

    /// Select the center pixel of the palette.
    pub fn select_center(&mut self, from_user: bool, now: Instant) -> bool {
        let Some(palette) = self.palette.as_ref() else {
            return false;
        };
        let (x, y) = (palette.width() / 2, palette.height() / 2);
        let Some(pixel) = palette.get_pixel(x, y) else {
            return false;
        };
        self.apply_selection(pixel, Point::new(x as f32, y as f32), from_user, now)
    }

    fn apply_selection(
        &mut self,
        pixel: Rgba,
        image_point: Point,
        from_user: bool,
        now: Instant,
    ) -> bool {
        if pixel == Rgba::TRANSPARENT {
            return false;
        }
        self.pure_selected_color = pixel;
        self.selected_image_point = image_point;
        self.selected_color = apply_hsv_factors(pixel);

        let envelope = ColorEnvelope::new(self.selected_color, from_user);
        if from_user && !self.debounce.is_zero() {
            // A newer selection replaces the one still waiting.
            self.pending = Some((now + self.debounce, envelope));
        } else {
            self.pending = None;
            self.envelopes.push_back(envelope);
        }
        true
    }

    /// Release a held-back notification whose debounce has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if let Some((deadline, _)) = &self.pending {
            if now >= *deadline {
                if let Some((_, envelope)) = self.pending.take() {
                    self.envelopes.push_back(envelope);
                }
            }
        }
    }

    /// Drain queued notifications, oldest first.
    pub fn take_envelopes(&mut self) -> Vec<ColorEnvelope> {
        self.envelopes.drain(..).collect()
    }
}

/// Round-trip `color` through HSV at full value scale and opacity. Opaque
/// colors come back unchanged; this is where brightness and alpha factors
/// apply once the picker exposes them.
pub fn apply_hsv_factors(color: Rgba) -> Rgba {
    let [h, s, v] = rgb_to_hsv(color);
    let [r, g, b] = hsv_to_rgb(h, s, v);
    Rgba::opaque(r, g, b)
}

/// `[hue 0..360, saturation 0..1, value 0..1]`.
pub fn rgb_to_hsv(color: Rgba) -> [f32; 3] {
    let r = color.r as f32 / 255.0;
    let g = color.g as f32 / 255.0;
    let b = color.b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    [h, s, max]
}

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let c = v * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let q = |ch: f32| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [q(r), q(g), q(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    /// Left half red, right half blue.
    fn split_bitmap() -> Bitmap {
        Bitmap::from_pixels(2, 1, vec![RED, BLUE])
    }

    /// A controller with a 100x100 canvas and the split bitmap fitted to 100x50
    /// at vertical offset 25.
    fn active(debounce: Duration, now: Instant) -> ColorPickerController {
        let mut picker = ColorPickerController::new(debounce, 30.0);
        picker.set_canvas_size(Size::new(100, 100), now);
        picker.set_palette_bitmap(split_bitmap(), now).unwrap();
        picker
    }

    #[test]
    fn wheel_radius_is_at_least_one_point() {
        assert_eq!(ColorPickerController::new(Duration::ZERO, 0.0).wheel_radius(), 1.0);
        assert_eq!(ColorPickerController::new(Duration::ZERO, -4.0).wheel_radius(), 1.0);
        let mut picker = ColorPickerController::default();
        assert_eq!(picker.wheel_radius(), 30.0);
        picker.set_wheel_radius(0.5);
        assert_eq!(picker.wheel_radius(), 1.0);
    }

    #[test]
    fn palette_before_canvas_is_rejected() {
        let mut picker = ColorPickerController::default();
        let err = picker.set_palette_bitmap(split_bitmap(), Instant::now());
        assert!(matches!(err, Err(AppError::CanvasNotMeasured)));
    }

    #[test]
    fn zero_canvas_size_is_ignored() {
        let mut picker = ColorPickerController::default();
        picker.set_canvas_size(Size::new(0, 100), Instant::now());
        assert_eq!(picker.canvas_size(), None);
    }

    #[test]
    fn setting_palette_fits_and_selects_center() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        assert_eq!(picker.palette().unwrap().size(), Size::new(100, 50));
        assert_eq!(picker.revise_tick(), 1);
        assert_eq!(picker.selected_color(), BLUE);
        assert_eq!(picker.selected_point(), Some(Point::new(50.0, 50.0)));

        let envelopes = picker.take_envelopes();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].color, BLUE);
        assert!(!envelopes[0].from_user);
    }

    #[test]
    fn pointer_selection_reads_pixel_under_pointer() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        picker.take_envelopes();

        assert!(picker.select_by_coordinate(Point::new(10.0, 30.0), true, now));
        assert_eq!(picker.selected_color(), RED);
        assert_eq!(picker.pure_selected_color(), RED);
        assert_eq!(picker.selected_point(), Some(Point::new(10.0, 30.0)));

        let envelopes = picker.take_envelopes();
        assert_eq!(envelopes.len(), 1);
        assert!(envelopes[0].from_user);
        assert_eq!(envelopes[0].hex_code, "FFFF0000");
    }

    #[test]
    fn top_row_is_selectable_and_outside_is_ignored() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        picker.take_envelopes();

        assert!(picker.select_by_coordinate(Point::new(80.0, 25.0), true, now));
        assert!(!picker.select_by_coordinate(Point::new(10.0, 24.9), true, now));
        assert!(!picker.select_by_coordinate(Point::new(10.0, 75.0), true, now));
        assert_eq!(picker.selected_color(), BLUE);
        assert_eq!(picker.take_envelopes().len(), 1);
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let now = Instant::now();
        let mut picker = ColorPickerController::default();
        picker.set_canvas_size(Size::new(2, 1), now);
        picker
            .set_palette_bitmap(Bitmap::from_pixels(2, 1, vec![Rgba::TRANSPARENT, RED]), now)
            .unwrap();
        picker.take_envelopes();
        assert!(!picker.select_by_coordinate(Point::new(0.5, 0.5), true, now));
        assert_eq!(picker.selected_color(), RED);
        assert!(picker.take_envelopes().is_empty());
    }

    #[test]
    fn translucent_pixels_are_made_opaque() {
        let now = Instant::now();
        let mut picker = ColorPickerController::default();
        picker.set_canvas_size(Size::new(1, 1), now);
        picker
            .set_palette_bitmap(Bitmap::from_pixels(1, 1, vec![Rgba::new(10, 20, 30, 40)]), now)
            .unwrap();
        assert_eq!(picker.pure_selected_color(), Rgba::new(10, 20, 30, 40));
        assert_eq!(picker.selected_color(), Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn debounce_only_fires_the_last_selection() {
        let t0 = Instant::now();
        let mut picker = active(Duration::from_millis(100), t0);
        picker.take_envelopes();

        picker.select_by_coordinate(Point::new(10.0, 50.0), true, t0);
        picker.poll(t0 + Duration::from_millis(50));
        assert!(picker.take_envelopes().is_empty());

        picker.select_by_coordinate(Point::new(90.0, 50.0), true, t0 + Duration::from_millis(60));
        picker.poll(t0 + Duration::from_millis(100));
        assert!(picker.take_envelopes().is_empty());
        assert_eq!(picker.pending_deadline(), Some(t0 + Duration::from_millis(160)));

        picker.poll(t0 + Duration::from_millis(160));
        let envelopes = picker.take_envelopes();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].color, BLUE);
        assert!(envelopes[0].from_user);
        assert_eq!(picker.pending_deadline(), None);
    }

    #[test]
    fn debounced_envelope_reports_lightness() {
        let t0 = Instant::now();
        let mut picker = ColorPickerController::new(Duration::from_millis(10), 30.0);
        picker.set_canvas_size(Size::new(1, 1), t0);
        picker
            .set_palette_bitmap(Bitmap::from_pixels(1, 1, vec![Rgba::WHITE]), t0)
            .unwrap();
        picker.take_envelopes();
        picker.select_by_coordinate(Point::new(0.5, 0.5), true, t0);
        picker.poll(t0 + Duration::from_millis(10));
        assert!(picker.take_envelopes()[0].is_light);
    }

    #[test]
    fn programmatic_selection_bypasses_debounce() {
        let t0 = Instant::now();
        let mut picker = active(Duration::from_secs(1), t0);
        assert_eq!(picker.take_envelopes().len(), 1);
        picker.select_by_coordinate(Point::new(10.0, 50.0), false, t0);
        assert_eq!(picker.take_envelopes().len(), 1);
    }

    #[test]
    fn resize_refits_and_reselects_center() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        picker.take_envelopes();
        picker.select_by_coordinate(Point::new(10.0, 50.0), true, now);
        picker.take_envelopes();

        picker.set_canvas_size(Size::new(200, 200), now);
        assert_eq!(picker.palette().unwrap().size(), Size::new(200, 100));
        assert_eq!(picker.revise_tick(), 2);
        assert_eq!(picker.selected_color(), BLUE);
        assert_eq!(picker.selected_point(), Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn selection_follows_zoom() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        picker.zoom_by(2.0, 8.0);
        // Left edge of the canvas now shows the palette at x = 25.
        assert!(picker.select_by_coordinate(Point::new(0.0, 50.0), true, now));
        assert_eq!(picker.selected_color(), RED);
        assert_eq!(picker.selected_point(), Some(Point::new(0.0, 50.0)));
    }

    #[test]
    fn release_drops_everything() {
        let now = Instant::now();
        let mut picker = active(Duration::ZERO, now);
        picker.release();
        assert!(picker.palette().is_none());
        assert!(picker.selected_point().is_none());
        assert!(picker.take_envelopes().is_empty());
        assert!(!picker.select_center(false, now));
    }

    #[test]
    fn hsv_round_trip_is_identity_for_opaque_colors() {
        for color in [
            RED,
            BLUE,
            Rgba::opaque(12, 200, 99),
            Rgba::opaque(255, 255, 255),
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(201, 17, 180),
        ] {
            assert_eq!(apply_hsv_factors(color), color);
        }
    }
}
