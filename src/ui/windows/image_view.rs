//! Image screen: open an image, pick colors by pointer, zoom and pan.

use crate::config::{RING_STROKE_WIDTH, Settings, ZOOM_PER_SCROLL_POINT};
use crate::engine::bitmap::{Bitmap, Size};
use crate::engine::picker::ColorPickerController;
use crate::engine::placement::Point;
use crate::error::AppError;
use crate::types::ColorEnvelope;
use crate::ui::colors::{CANVAS_BACKGROUND, HUE_STRIP, contrast, to_color32};
use crate::ui::window::AppState;
use eframe::egui::{self, Color32, PointerButton, RichText, Sense, Stroke, TextureOptions};
use std::path::Path;
use std::time::Instant;

pub struct ImageView {
    path_input: String,
    picker: ColorPickerController,
    /// Decoded image waiting for the canvas to be measured.
    pending_image: Option<Bitmap>,
    texture: Option<egui::TextureHandle>,
    /// `revise_tick` of the palette the texture was built from.
    texture_tick: u64,
    current: Option<ColorEnvelope>,
    error: Option<String>,
}

impl ImageView {
    pub fn new(settings: &Settings) -> Self {
        let mut view = Self {
            path_input: String::new(),
            picker: ColorPickerController::default(),
            pending_image: None,
            texture: None,
            texture_tick: 0,
            current: None,
            error: None,
        };
        view.configure(settings);
        view
    }

    /// Apply picker-related settings.
    pub fn configure(&mut self, settings: &Settings) {
        self.picker.set_debounce(settings.debounce());
        self.picker.set_wheel_radius(settings.wheel_radius);
    }

    /// Decode `path`; the palette is installed on the next frame.
    pub fn open(&mut self, path: &Path) {
        self.path_input = path.display().to_string();
        match Bitmap::open(path) {
            Ok(bitmap) => {
                self.error = None;
                self.pending_image = Some(bitmap);
            }
            Err(e) => {
                log::error!("failed to open {}: {e}", path.display());
                self.error = Some(e.to_string());
            }
        }
    }

    /// Time at which the UI must wake up to flush a debounced pick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.picker.pending_deadline()
    }

    fn install_pending(&mut self, now: Instant) {
        let Some(bitmap) = self.pending_image.take() else {
            return;
        };
        match self.picker.set_palette_bitmap(bitmap.clone(), now) {
            Ok(()) => {}
            Err(AppError::CanvasNotMeasured) => self.pending_image = Some(bitmap),
            Err(e) => {
                log::error!("failed to set palette: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if self.picker.revise_tick() == self.texture_tick {
            return;
        }
        self.texture_tick = self.picker.revise_tick();
        self.texture = self.picker.palette().map(|palette| {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [palette.width(), palette.height()],
                &palette.to_rgba_bytes(),
            );
            ctx.load_texture("image-palette", image, TextureOptions::NEAREST)
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, state: &mut AppState<'_>) {
        ui.horizontal(|ui| {
            ui.label("Image:");
            ui.text_edit_singleline(&mut self.path_input);
            if ui.button("Open").clicked() && !self.path_input.trim().is_empty() {
                let path = self.path_input.trim().to_owned();
                self.open(Path::new(&path));
            }
            if ui.button("Reset view").clicked() {
                self.picker.reset_view();
            }
            if ui.button("Close").clicked() {
                self.picker.release();
                self.pending_image = None;
                self.current = None;
            }
        });

        let (fill, text_color, label) = match &self.current {
            Some(env) => (to_color32(env.color), contrast(env.is_light), env.hex()),
            None => (Color32::BLACK, Color32::WHITE, "pick a color".to_owned()),
        };
        egui::Frame::default()
            .fill(fill)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_min_height(60.0);
                ui.horizontal_centered(|ui| {
                    let pure = self.picker.pure_selected_color();
                    ui.label(RichText::new(label).color(text_color).size(22.0).monospace())
                        .on_hover_text(format!("pixel {}, alpha {}", pure.hex(), pure.a));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(env) = &self.current {
                            if ui.button("Copy").clicked() {
                                ui.ctx().copy_text(env.hex());
                                state.remember(env.color);
                            }
                        }
                    });
                });
            });

        if let Some(error) = &self.error {
            ui.colored_label(Color32::LIGHT_RED, error);
        }
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: egui::Rect,
        max_zoom: f32,
        now: Instant,
    ) -> bool {
        if response.hovered() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            let factor = (scroll * ZOOM_PER_SCROLL_POINT).exp() * pinch;
            if factor != 1.0 {
                self.picker.zoom_by(factor, max_zoom);
            }
        }
        if response.double_clicked() {
            self.picker.reset_view();
        }
        if response.dragged_by(PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.picker.pan_by(delta.x, delta.y);
        }

        let primary_down = ui.input(|i| i.pointer.primary_down());
        if primary_down && response.is_pointer_button_down_on() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - rect.min;
                self.picker
                    .select_by_coordinate(Point::new(local.x, local.y), true, now);
            }
        }
        response.clicked() || response.drag_stopped_by(PointerButton::Primary)
    }

    /// Draw the image screen into the central panel.
    pub fn render_inline(&mut self, ui: &mut egui::Ui, state: &mut AppState<'_>) {
        let now = Instant::now();
        self.toolbar(ui, state);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.picker.set_canvas_size(
            Size::new(rect.width() as usize, rect.height() as usize),
            now,
        );
        self.install_pending(now);
        self.refresh_texture(ui.ctx());

        let released = self.handle_input(ui, &response, rect, state.settings.max_zoom, now);
        self.picker.poll(now);
        if let Some(latest) = self.picker.take_envelopes().pop() {
            self.current = Some(latest);
        }
        if released && self.picker.pending_deadline().is_none() {
            if let Some(env) = &self.current {
                state.remember(env.color);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

        let (Some(texture), Some(placement)) = (&self.texture, self.picker.placement()) else {
            let band = rect.width() / HUE_STRIP.len() as f32;
            for (i, color) in HUE_STRIP.iter().enumerate() {
                let x = rect.left() + i as f32 * band;
                painter.rect_filled(
                    egui::Rect::from_min_max(
                        egui::pos2(x, rect.bottom() - 8.0),
                        egui::pos2(x + band, rect.bottom()),
                    ),
                    0.0,
                    *color,
                );
            }
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open or drop an image to pick colors",
                egui::FontId::proportional(16.0),
                Color32::WHITE,
            );
            return;
        };

        let (min, max) = placement.image_rect();
        let image_rect = egui::Rect::from_min_max(
            rect.min + egui::vec2(min.x, min.y),
            rect.min + egui::vec2(max.x, max.y),
        );
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), image_rect, uv, Color32::WHITE);

        if let Some(point) = self.picker.selected_point() {
            let center = rect.min + egui::vec2(point.x, point.y);
            let selected = self.picker.selected_color();
            painter.circle(
                center,
                self.picker.wheel_radius(),
                to_color32(selected),
                Stroke::new(RING_STROKE_WIDTH, contrast(selected.is_light())),
            );
        }
    }
}
