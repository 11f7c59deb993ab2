use std::env;
use std::path::PathBuf;

use simple_color_picker::ui::app::App;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional image to open on the image screen right away.
    let initial_image = env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Simple Color Picker",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, initial_image)))),
    )
}
