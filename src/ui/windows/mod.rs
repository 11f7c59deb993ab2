//! Screens shown in the central panel and floating windows implementing `AppWindow`.

pub mod camera_view;
pub mod history_view;
pub mod image_view;
pub mod settings_view;
