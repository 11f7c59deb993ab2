//! Settings window: analyzer interval, picker tuning and the camera source.

use crate::camera::SourceSpec;
use crate::config::Settings;
use crate::ui::window::{AppState, AppWindow};
use eframe::egui::{self, Color32, Vec2};
use std::path::PathBuf;

/// Editable copy of a [`SourceSpec`]. Only pushed to the capture thread
/// when "Apply source" is pressed.
#[derive(Clone, Debug, PartialEq)]
struct SourceDraft {
    raw_file: bool,
    path: String,
    width: usize,
    height: usize,
}

impl SourceDraft {
    fn from_spec(spec: &SourceSpec) -> Self {
        match spec {
            SourceSpec::Synthetic { width, height } => Self {
                raw_file: false,
                path: String::new(),
                width: *width,
                height: *height,
            },
            SourceSpec::RawFile {
                path,
                width,
                height,
            } => Self {
                raw_file: true,
                path: path.display().to_string(),
                width: *width,
                height: *height,
            },
        }
    }

    fn to_spec(&self) -> SourceSpec {
        if self.raw_file {
            SourceSpec::RawFile {
                path: PathBuf::from(self.path.trim()),
                width: self.width,
                height: self.height,
            }
        } else {
            SourceSpec::Synthetic {
                width: self.width,
                height: self.height,
            }
        }
    }
}

pub struct SettingsView {
    open: bool,
    draft: Option<SourceDraft>,
    status: Option<(bool, String)>,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            open: false,
            draft: None,
            status: None,
        }
    }
}

impl SettingsView {
    fn source_section(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        let draft = self
            .draft
            .get_or_insert_with(|| SourceDraft::from_spec(&settings.camera));

        ui.horizontal(|ui| {
            ui.radio_value(&mut draft.raw_file, false, "Test pattern");
            ui.radio_value(&mut draft.raw_file, true, "Raw I420 file");
        });
        if draft.raw_file {
            ui.horizontal(|ui| {
                ui.label("Path:");
                ui.text_edit_singleline(&mut draft.path);
            });
        }
        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(egui::DragValue::new(&mut draft.width).range(2..=4096));
            ui.label("x");
            ui.add(egui::DragValue::new(&mut draft.height).range(2..=4096));
        });

        let spec = draft.to_spec();
        let dirty = spec != settings.camera;
        if ui
            .add_enabled(dirty, egui::Button::new("Apply source"))
            .clicked()
        {
            log::info!("camera source changed to {spec:?}");
            settings.camera = spec;
        }
    }
}

impl AppWindow for SettingsView {
    fn name(&self) -> &str {
        "Settings"
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
            .default_size(Vec2::new(360.0, 320.0))
            .show(ctx, |ui| {
                let settings = &mut *state.settings;

                ui.heading("Camera");
                ui.horizontal(|ui| {
                    ui.label("Analyze every (ms):");
                    ui.add(egui::Slider::new(&mut settings.analyze_interval_ms, 0..=10_000));
                });
                ui.horizontal(|ui| {
                    ui.label("Frame rate:");
                    ui.add(egui::Slider::new(&mut settings.frame_rate, 1..=60));
                });
                self.source_section(ui, settings);

                ui.separator();
                ui.heading("Image");
                ui.horizontal(|ui| {
                    ui.label("Debounce (ms):");
                    ui.add(egui::Slider::new(&mut settings.debounce_ms, 0..=2_000));
                });
                ui.horizontal(|ui| {
                    ui.label("Selector radius:");
                    ui.add(egui::Slider::new(&mut settings.wheel_radius, 5.0..=80.0));
                });
                ui.horizontal(|ui| {
                    ui.label("Max zoom:");
                    ui.add(egui::Slider::new(&mut settings.max_zoom, 1.0..=32.0));
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.status = Some(match settings.save() {
                            Ok(()) => (true, format!("saved to {}", Settings::default_path().display())),
                            Err(e) => {
                                log::error!("failed to save settings: {e}");
                                (false, e.to_string())
                            }
                        });
                    }
                    if ui.button("Restore defaults").clicked() {
                        *settings = Settings::default();
                        self.draft = None;
                    }
                });
                if let Some((ok, message)) = &self.status {
                    let color = if *ok { Color32::LIGHT_GREEN } else { Color32::LIGHT_RED };
                    ui.colored_label(color, message);
                }
                ui.weak(format!("v{}", env!("CARGO_PKG_VERSION")));
            });
        self.open = open;
    }
}
