//! UI layer: App orchestrator, AppWindow trait, shared colors, and screens.

pub mod app;
pub mod colors;
pub mod window;
pub mod windows;
