//! The `AppWindow` trait and the shared `AppState` view passed to each window.
//!
//! To add a new floating window:
//! 1. Create a new file in `ui/windows/`.
//! 2. Implement `AppWindow` for your struct.
//! 3. Push `Box::new(MyWindow::default())` into `App::windows` in `App::new()`.

use crate::camera::Control;
use crate::config::{HISTORY_LEN, Settings};
use crate::types::Rgba;
use std::collections::VecDeque;
use tokio::sync::mpsc::Sender as TokioSender;

/// Mutable view of application state shared with every screen and window.
pub struct AppState<'a> {
    /// Live settings. The app diffs them every frame and forwards changes
    /// to the capture thread and the picker.
    pub settings: &'a mut Settings,
    /// Recently kept colors, newest first.
    pub history: &'a mut VecDeque<Rgba>,
    pub control_tx: &'a TokioSender<Control>,
}

impl AppState<'_> {
    /// Keep `color` in the history unless it is already the newest entry.
    pub fn remember(&mut self, color: Rgba) {
        if self.history.front() == Some(&color) {
            return;
        }
        self.history.push_front(color);
        self.history.truncate(HISTORY_LEN);
    }

    /// Send a control command to the capture thread without blocking.
    pub fn control(&self, ctrl: Control) {
        if let Err(e) = self.control_tx.try_send(ctrl) {
            log::warn!("capture control dropped: {e}");
        }
    }
}

/// Trait implemented by every floating window.
///
/// Each window owns its own open/closed flag and any window-specific UI state.
/// The orchestrator (`App`) iterates over all registered windows and calls
/// `show` on each frame.
pub trait AppWindow {
    /// Display name shown on the toggle button and as the egui window title.
    fn name(&self) -> &str;

    fn is_open(&self) -> bool;

    /// Toggle the window's open/closed state.
    fn toggle(&mut self);

    /// Draw the window contents.  Called every frame by `App::update`.
    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>);
}
