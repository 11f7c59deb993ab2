//! Application orchestrator: owns settings and history, drives the capture
//! thread and the screen/window system.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver as StdReceiver};
use std::thread;
use std::time::Instant;

use crate::camera::{self, CameraMessage, Control, UiLink};
use crate::config::Settings;
use crate::engine::bitmap::Bitmap;
use crate::types::Rgba;
use crate::ui::window::{AppState, AppWindow};
use crate::ui::windows::{
    camera_view::CameraView, history_view::HistoryView, image_view::ImageView,
    settings_view::SettingsView,
};
use eframe::egui;
use tokio::sync::mpsc::{self as tokio_mpsc, Sender as TokioSender};
use tokio::sync::watch;

// ── Screens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Camera,
    Image,
}

// ── App struct ─────────────────────────────────────────────────────────────────

/// The top-level application, implementing [`eframe::App`].
///
/// `App` only:
/// 1. Drains the capture channel and the preview slot into the camera screen.
/// 2. Forwards settings edits to the capture thread and the picker.
/// 3. Renders the active screen in the central panel and delegates every
///    floating window to the registered `windows` vec.
pub struct App {
    rx: StdReceiver<CameraMessage>,
    /// Newest camera preview; the capture loop overwrites it in place.
    preview_rx: watch::Receiver<Option<Bitmap>>,
    control_tx: TokioSender<Control>,

    settings: Settings,
    /// Settings as last forwarded; diffed against `settings` each frame.
    applied: Settings,
    history: VecDeque<Rgba>,

    screen: Screen,
    camera_view: CameraView,
    image_view: ImageView,
    windows: Vec<Box<dyn AppWindow>>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_image: Option<PathBuf>) -> Self {
        let settings = Settings::load_or_default();
        let (tx, rx) = std_mpsc::channel();
        let (preview, preview_rx) = watch::channel(None);
        let (control_tx, control_rx) = tokio_mpsc::channel(8);
        let link = UiLink {
            tx,
            preview,
            ctx: cc.egui_ctx.clone(),
        };
        let spec = settings.camera.clone();
        let interval = settings.analyze_interval();
        let frame_rate = settings.frame_rate;

        // Spawn background Tokio runtime + capture loop onto a dedicated OS thread.
        thread::spawn(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build Tokio runtime")
                .block_on(camera::run_capture_loop(
                    &link, control_rx, spec, interval, frame_rate,
                ));
        });

        // Register all floating windows. Adding a new window = one line here.
        let windows: Vec<Box<dyn AppWindow>> = vec![
            Box::new(HistoryView::default()),
            Box::new(SettingsView::default()),
        ];

        let mut app = Self {
            rx,
            preview_rx,
            control_tx,
            image_view: ImageView::new(&settings),
            applied: settings.clone(),
            settings,
            history: VecDeque::new(),
            screen: Screen::Camera,
            camera_view: CameraView::default(),
            windows,
        };
        if let Some(path) = initial_image {
            app.open_image(path);
        }
        app
    }

    fn send(&self, ctrl: Control) {
        if let Err(e) = self.control_tx.try_send(ctrl) {
            log::warn!("capture control dropped: {e}");
        }
    }

    /// The capture loop only runs while the camera screen is shown.
    fn switch_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        self.screen = screen;
        match screen {
            Screen::Image => self.send(Control::Pause),
            Screen::Camera if !self.camera_view.paused => self.send(Control::Resume),
            Screen::Camera => {}
        }
    }

    fn open_image(&mut self, path: PathBuf) {
        self.image_view.open(&path);
        self.switch_screen(Screen::Image);
    }

    fn drain_camera(&mut self) {
        if self.preview_rx.has_changed().unwrap_or(false) {
            if let Some(preview) = self.preview_rx.borrow_and_update().clone() {
                self.camera_view.set_preview(preview);
            }
        }
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                CameraMessage::Color(sample) => self.camera_view.set_sample(sample),
                CameraMessage::Error(e) => self.camera_view.set_error(e),
            }
        }
    }

    /// Forward whatever changed in the settings window since the last frame.
    fn sync_settings(&mut self) {
        if self.settings == self.applied {
            return;
        }
        if self.settings.analyze_interval_ms != self.applied.analyze_interval_ms {
            self.send(Control::SetInterval(self.settings.analyze_interval()));
        }
        if self.settings.frame_rate != self.applied.frame_rate {
            self.send(Control::SetFrameRate(self.settings.frame_rate));
        }
        if self.settings.camera != self.applied.camera {
            self.send(Control::ChangeSource(self.settings.camera.clone()));
        }
        self.image_view.configure(&self.settings);
        self.applied = self.settings.clone();
    }
}

// ── eframe::App ────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── 1. Drain incoming messages ────────────────────────────────────────
        self.drain_camera();

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.open_image(path);
        }

        // ── 2. Screen selector and window toggles ─────────────────────────────
        egui::TopBottomPanel::top("screens").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let mut screen = self.screen;
                ui.selectable_value(&mut screen, Screen::Camera, "Camera");
                ui.selectable_value(&mut screen, Screen::Image, "Image");
                self.switch_screen(screen);

                ui.separator();
                for w in &mut self.windows {
                    if ui.selectable_label(w.is_open(), w.name()).clicked() {
                        w.toggle();
                    }
                }
            });
        });

        // ── 3. Central panel ──────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut state = AppState {
                settings: &mut self.settings,
                history: &mut self.history,
                control_tx: &self.control_tx,
            };
            match self.screen {
                Screen::Camera => self.camera_view.render_inline(ui, &mut state),
                Screen::Image => self.image_view.render_inline(ui, &mut state),
            }
        });

        // ── 4. Floating windows ───────────────────────────────────────────────
        let mut state = AppState {
            settings: &mut self.settings,
            history: &mut self.history,
            control_tx: &self.control_tx,
        };
        for w in &mut self.windows {
            w.show(ctx, &mut state);
        }

        self.sync_settings();

        if let Some(deadline) = self.image_view.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
