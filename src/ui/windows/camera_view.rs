//! Camera screen: live preview, center ring and the sampled color bar.

use crate::camera::Control;
use crate::config::{RING_STROKE_WIDTH, VIEWFINDER_RING_RADIUS};
use crate::engine::bitmap::{Bitmap, Size};
use crate::engine::placement::fill_center_uv;
use crate::types::{ColorSample, Rgba};
use crate::ui::colors::{CANVAS_BACKGROUND, HUE_STRIP, contrast, to_color32};
use crate::ui::window::AppState;
use eframe::egui::{self, Color32, RichText, Sense, Stroke, TextureOptions};

#[derive(Default)]
pub struct CameraView {
    /// Latest preview not yet uploaded. Older ones are simply replaced.
    pending_preview: Option<Bitmap>,
    texture: Option<egui::TextureHandle>,
    preview_size: Size,
    sample: Option<ColorSample>,
    error: Option<String>,
    pub paused: bool,
}

impl CameraView {
    pub fn set_preview(&mut self, preview: Bitmap) {
        self.error = None;
        self.pending_preview = Some(preview);
    }

    pub fn set_sample(&mut self, sample: ColorSample) {
        self.sample = Some(sample);
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.texture = None;
    }

    fn upload_preview(&mut self, ctx: &egui::Context) {
        let Some(preview) = self.pending_preview.take() else {
            return;
        };
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [preview.width(), preview.height()],
            &preview.to_rgba_bytes(),
        );
        self.preview_size = preview.size();
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("camera-preview", image, TextureOptions::LINEAR))
            }
        }
    }

    fn result_bar(&mut self, ui: &mut egui::Ui, state: &mut AppState<'_>) {
        let sample = self.sample.unwrap_or(ColorSample {
            color: Rgba::BLACK,
            is_light: false,
        });
        let fill = to_color32(sample.color);
        let text_color = contrast(sample.is_light);

        egui::Frame::default()
            .fill(fill)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_min_height(60.0);
                ui.horizontal_centered(|ui| {
                    let label = match self.sample {
                        Some(s) => s.hex(),
                        None => "waiting for camera...".to_owned(),
                    };
                    ui.label(RichText::new(label).color(text_color).size(22.0).monospace());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let toggle = if self.paused { "Resume" } else { "Pause" };
                        if ui.button(toggle).clicked() {
                            self.paused = !self.paused;
                            state.control(if self.paused {
                                Control::Pause
                            } else {
                                Control::Resume
                            });
                        }
                        if let Some(s) = self.sample {
                            if ui.button("Copy").clicked() {
                                ui.ctx().copy_text(s.hex());
                                state.remember(s.color);
                            }
                        }
                    });
                });
            });
    }

    /// Draw the camera screen into the central panel.
    pub fn render_inline(&mut self, ui: &mut egui::Ui, state: &mut AppState<'_>) {
        self.upload_preview(ui.ctx());
        self.result_bar(ui, state);

        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

        if let Some(error) = &self.error {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("No camera!\n{error}"),
                egui::FontId::proportional(16.0),
                Color32::WHITE,
            );
            return;
        }

        match &self.texture {
            Some(texture) => {
                let (min, max) = fill_center_uv(self.preview_size, rect.width(), rect.height());
                let uv = egui::Rect::from_min_max(egui::pos2(min[0], min[1]), egui::pos2(max[0], max[1]));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                let band = rect.width() / HUE_STRIP.len() as f32;
                for (i, color) in HUE_STRIP.iter().enumerate() {
                    let x = rect.left() + i as f32 * band;
                    let strip = egui::Rect::from_min_max(
                        egui::pos2(x, rect.center().y - 4.0),
                        egui::pos2(x + band, rect.center().y + 4.0),
                    );
                    painter.rect_filled(strip, 0.0, *color);
                }
            }
        }

        let ring = contrast(self.sample.is_some_and(|s| s.is_light));
        painter.circle_stroke(
            rect.center(),
            VIEWFINDER_RING_RADIUS,
            Stroke::new(RING_STROKE_WIDTH, ring),
        );
    }
}
