// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Anatomy Lens
//!
//! A desktop toy where a capybara mage "analyzes" a character image:
//! labeled anatomy markers are placed over the image on four layers, can
//! be dragged into place, and double as targets in a massage mini-game.

mod app;
mod config;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::AnatomyApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("{:#}; using default settings", e);
        AppConfig::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0])
            .with_title("Anatomy Lens - Capybara Mage"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Anatomy Lens",
        options,
        Box::new(move |_cc| Ok(Box::new(AnatomyApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
