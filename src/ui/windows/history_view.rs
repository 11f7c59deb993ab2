//! History window: recently kept colors, click a swatch to copy its hex.

use crate::ui::colors::{contrast, to_color32};
use crate::ui::window::{AppState, AppWindow};
use eframe::egui::{self, RichText, Sense, Vec2};

pub struct HistoryView {
    open: bool,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self { open: false }
    }
}

impl AppWindow for HistoryView {
    fn name(&self) -> &str {
        "History"
    }
    fn is_open(&self) -> bool {
        self.open
    }
    fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>) {
        let mut open = self.open;
        egui::Window::new(self.name())
            .open(&mut open)
            .default_size(Vec2::new(220.0, 360.0))
            .show(ctx, |ui| {
                if state.history.is_empty() {
                    ui.label("Copy a color to keep it here.");
                    return;
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for color in state.history.iter() {
                        let hex = color.hex();
                        let (rect, response) =
                            ui.allocate_exact_size(Vec2::new(ui.available_width(), 28.0), Sense::click());
                        ui.painter().rect_filled(rect, 4.0, to_color32(*color));
                        ui.painter().text(
                            rect.left_center() + egui::vec2(8.0, 0.0),
                            egui::Align2::LEFT_CENTER,
                            &hex,
                            egui::FontId::monospace(14.0),
                            contrast(color.is_light()),
                        );
                        if response.clicked() {
                            ui.ctx().copy_text(hex.clone());
                        }
                        response.on_hover_text(RichText::new(format!("Copy {hex}")));
                    }
                });
                ui.separator();
                if ui.button("Clear").clicked() {
                    state.history.clear();
                }
            });
        self.open = open;
    }
}
