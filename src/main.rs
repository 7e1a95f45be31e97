//! KlineView - Stock K-line Viewer & Interactive Candlestick Charts
//!
//! A Rust application for browsing daily kline data and displaying an
//! interactive candlestick chart with configurable styling.

mod charts;
mod data;
mod gui;

use eframe::egui;
use gui::KlineViewApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("KlineView"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "KlineView",
        options,
        Box::new(|cc| Ok(Box::new(KlineViewApp::new(cc)))),
    )
}
