//! dq-tui - data quality analysis in the terminal
//!
//! This is the main entry point for the dq-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod router;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::{CountryRepository, InMemoryCountryRepository, JsonCountryRepository};
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use simplelog::{LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    init_logging();

    let config = match Config::load() {
        Some(config) => config,
        None => {
            let config = Config::default();
            if let Err(e) = config.save() {
                log::warn!("could not write default config: {}", e);
            }
            config
        }
    };
    let repository = open_repository(&config);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(config, repository);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        log::error!("{:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to `~/.dq-tui/dq-tui.log`; the terminal belongs to the UI
///
/// Runs before raw mode, so failures are reported on stderr and the app
/// continues without a log.
fn init_logging() {
    if let Err(e) = try_init_logging() {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
}

fn try_init_logging() -> Result<()> {
    let dir = Config::config_dir().context("no home directory for the log file")?;
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("dq-tui.log");
    let log_file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), log_file)?;
    Ok(())
}

fn open_repository(config: &Config) -> Arc<dyn CountryRepository> {
    if Path::new(&config.metadata_path).exists() {
        log::info!("reading organisation units from {}", config.metadata_path);
        Arc::new(JsonCountryRepository::new(&config.metadata_path))
    } else {
        log::warn!(
            "metadata file {} not found, starting without countries",
            config.metadata_path
        );
        Arc::new(InMemoryCountryRepository::default())
    }
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                log::error!("draw error: {}", e);
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                log::trace!("action {}", a);
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick so background fetches get collected
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
