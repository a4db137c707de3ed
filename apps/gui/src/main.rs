mod app;
mod chart_view;
mod controller;
mod state;

use anyhow::Context;
use app::CanvasApp;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use strategy_canvas::CanvasConfig;

fn main() -> anyhow::Result<()> {
    let level = std::env::var("CANVAS_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info);
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let config = CanvasConfig::resolve(None).context("failed to load canvas config")?;
    info!("starting canvas gui with {:?} layout", config.layout);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Strategy Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(CanvasApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("gui exited with an error: {e}"))
}
