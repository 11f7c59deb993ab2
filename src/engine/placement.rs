//! Affine placement of a fitted bitmap inside a canvas, and the inverse
//! mapping from pointer positions back to bitmap pixels.
//!
//! The bitmap is first centered in the canvas at its fitted size. A view
//! transform is then applied on top: a uniform zoom about the canvas center
//! followed by a pan offset. All coordinates are canvas-local points.

use crate::config::MIN_ZOOM;
use crate::engine::bitmap::Size;

/// A point in canvas-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    canvas: Size,
    image: Size,
    zoom: f32,
    pan: Point,
}

impl Placement {
    /// Center `image` (already fitted) inside `canvas` with an identity view.
    pub fn new(canvas: Size, image: Size) -> Self {
        Self {
            canvas,
            image,
            zoom: 1.0,
            pan: Point::default(),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    fn center(&self) -> Point {
        Point::new(self.canvas.width as f32 / 2.0, self.canvas.height as f32 / 2.0)
    }

    /// Top-left corner of the unzoomed image.
    pub fn origin(&self) -> Point {
        Point::new(
            (self.canvas.width as f32 - self.image.width as f32) / 2.0,
            (self.canvas.height as f32 - self.image.height as f32) / 2.0,
        )
    }

    /// Bitmap coordinates (may be fractional) → canvas coordinates.
    pub fn to_screen(&self, p: Point) -> Point {
        let o = self.origin();
        let c = self.center();
        Point::new(
            c.x + self.zoom * (o.x + p.x - c.x) + self.pan.x,
            c.y + self.zoom * (o.y + p.y - c.y) + self.pan.y,
        )
    }

    /// Canvas coordinates → fractional bitmap coordinates.
    pub fn to_image(&self, s: Point) -> Point {
        let o = self.origin();
        let c = self.center();
        Point::new(
            (s.x - self.pan.x - c.x) / self.zoom + c.x - o.x,
            (s.y - self.pan.y - c.y) / self.zoom + c.y - o.y,
        )
    }

    /// Canvas coordinates → the pixel under them, or `None` off the image.
    pub fn to_bitmap(&self, s: Point) -> Option<(usize, usize)> {
        let p = self.to_image(s);
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x.floor() as usize, p.y.floor() as usize);
        if x >= self.image.width || y >= self.image.height {
            return None;
        }
        Some((x, y))
    }

    /// Canvas-space `(min, max)` corners of the displayed image.
    pub fn image_rect(&self) -> (Point, Point) {
        (
            self.to_screen(Point::new(0.0, 0.0)),
            self.to_screen(Point::new(self.image.width as f32, self.image.height as f32)),
        )
    }

    /// Multiply the zoom by `factor`, clamped to `[MIN_ZOOM, max]`. Returning
    /// to the minimum also recenters the image.
    pub fn zoom_by(&mut self, factor: f32, max: f32) {
        let max = max.max(MIN_ZOOM);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, max);
        if self.zoom <= MIN_ZOOM {
            self.pan = Point::default();
        }
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }
}

/// Normalised UV sub-rectangle `([u0, v0], [u1, v1])` that shows `src`
/// filling a `dst` viewport, cropping the overflowing axis evenly.
pub fn fill_center_uv(src: Size, dst_width: f32, dst_height: f32) -> ([f32; 2], [f32; 2]) {
    if src.is_empty() || dst_width <= 0.0 || dst_height <= 0.0 {
        return ([0.0, 0.0], [1.0, 1.0]);
    }
    let src_ratio = src.aspect();
    let dst_ratio = dst_width / dst_height;
    if src_ratio > dst_ratio {
        let visible = dst_ratio / src_ratio;
        let u0 = (1.0 - visible) / 2.0;
        ([u0, 0.0], [u0 + visible, 1.0])
    } else {
        let visible = src_ratio / dst_ratio;
        let v0 = (1.0 - visible) / 2.0;
        ([0.0, v0], [1.0, v0 + visible])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn image_is_centered_on_both_axes() {
        let placement = Placement::new(Size::new(400, 300), Size::new(200, 100));
        assert_eq!(placement.origin(), Point::new(100.0, 100.0));
        let (min, max) = placement.image_rect();
        assert_eq!(min, Point::new(100.0, 100.0));
        assert_eq!(max, Point::new(300.0, 200.0));
    }

    #[test]
    fn pointer_maps_to_pixel_under_it() {
        let placement = Placement::new(Size::new(400, 300), Size::new(200, 100));
        assert_eq!(placement.to_bitmap(Point::new(100.0, 100.0)), Some((0, 0)));
        assert_eq!(placement.to_bitmap(Point::new(299.9, 199.9)), Some((199, 99)));
        assert_eq!(placement.to_bitmap(Point::new(150.5, 120.2)), Some((50, 20)));
    }

    #[test]
    fn pointer_outside_image_maps_to_none() {
        let placement = Placement::new(Size::new(400, 300), Size::new(200, 100));
        assert_eq!(placement.to_bitmap(Point::new(99.9, 150.0)), None);
        assert_eq!(placement.to_bitmap(Point::new(300.0, 150.0)), None);
        assert_eq!(placement.to_bitmap(Point::new(150.0, 99.0)), None);
        assert_eq!(placement.to_bitmap(Point::new(150.0, 200.0)), None);
    }

    #[test]
    fn zoom_and_pan_round_trip() {
        let mut placement = Placement::new(Size::new(400, 300), Size::new(200, 100));
        placement.zoom_by(2.5, 8.0);
        placement.pan_by(-30.0, 12.0);
        let p = Point::new(37.25, 81.5);
        assert!(approx(placement.to_image(placement.to_screen(p)), p));
    }

    #[test]
    fn zoom_is_about_the_canvas_center() {
        let mut placement = Placement::new(Size::new(400, 300), Size::new(200, 100));
        placement.zoom_by(2.0, 8.0);
        // The canvas center keeps pointing at the image center.
        assert_eq!(placement.to_bitmap(Point::new(200.0, 150.0)), Some((100, 50)));
        // The unzoomed top-left corner now lands inside the image.
        assert_eq!(placement.to_bitmap(Point::new(100.0, 100.0)), Some((50, 25)));
    }

    #[test]
    fn zoom_is_clamped_and_min_zoom_recenters() {
        let mut placement = Placement::new(Size::new(100, 100), Size::new(100, 100));
        placement.zoom_by(100.0, 4.0);
        assert_eq!(placement.zoom(), 4.0);
        placement.pan_by(10.0, 10.0);
        placement.zoom_by(0.01, 4.0);
        assert_eq!(placement.zoom(), 1.0);
        assert_eq!(placement.pan(), Point::default());
    }

    #[test]
    fn fill_center_crops_the_wider_axis() {
        let (min, max) = fill_center_uv(Size::new(400, 100), 200.0, 100.0);
        assert_eq!(min, [0.25, 0.0]);
        assert_eq!(max, [0.75, 1.0]);

        let (min, max) = fill_center_uv(Size::new(100, 400), 100.0, 200.0);
        assert_eq!(min, [0.0, 0.25]);
        assert_eq!(max, [1.0, 0.75]);

        assert_eq!(fill_center_uv(Size::new(0, 0), 10.0, 10.0), ([0.0, 0.0], [1.0, 1.0]));
    }
}
