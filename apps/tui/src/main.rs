mod app;
mod event;
mod tui;
mod view;

use crate::app::App;
use crate::event::EventHandler;
use crate::tui::Tui;
use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use strategy_canvas::CanvasConfig;

const LOG_FILE: &str = "canvas_tui.log";

fn main() -> Result<()> {
    // The terminal belongs to the UI, so logs go to a file.
    let level = std::env::var("CANVAS_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info);
    WriteLogger::init(level, Config::default(), File::create(LOG_FILE)?)?;

    let config = CanvasConfig::resolve(None).context("failed to load canvas config")?;
    info!("starting canvas tui with {:?} layout", config.layout);

    let mut app = App::new(config);
    let mut tui = Tui::new()?;
    let event_handler = EventHandler::new();

    let outcome = run(&mut app, &mut tui, &event_handler);
    Tui::restore_terminal()?;
    outcome
}

fn run(app: &mut App, tui: &mut Tui, events: &EventHandler) -> Result<()> {
    while app.is_running {
        tui.draw(app)?;
        let action = events.next(app.input_mode())?;
        app.dispatch(action)?;
    }
    Ok(())
}
