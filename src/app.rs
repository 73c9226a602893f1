// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the application structure that implements the
//! eframe::App trait. It loads images in the background, routes UI
//! actions into the anatomy session and drives the session's timers from
//! the frame clock.

use crate::config::AppConfig;
use crate::io::media::{self, IMAGE_EXTENSIONS};
use crate::models::{
    marker::LayerKind,
    session::{Notice, Session, SessionImage},
};
use crate::ui::{
    canvas::{self, CanvasAction},
    marker::DragTracker,
    sidebar::{self, SidebarAction},
    toolbar::{self, ToolbarAction},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Duration;

/// Result of background image loading operation.
struct LoadedImageData {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Main application state.
pub struct AnatomyApp {
    config: AppConfig,

    /// Anatomy session (image, notes, layers, modes)
    session: Session,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Marker drag in progress
    drag: DragTracker,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Status line message and the time it expires
    notice: Option<(String, f64)>,

    show_about: bool,
}

impl AnatomyApp {
    /// Create a new application instance.
    pub fn new(config: AppConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Session seed: {}", seed);

        Self {
            session: Session::new(&config, StdRng::seed_from_u64(seed)),
            config,
            image_texture: None,
            drag: DragTracker::new(),
            image_loader: None,
            loading_message: None,
            notice: None,
            show_about: false,
        }
    }

    /// Pick an image with the native file dialog and load it.
    fn open_image_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    /// Load an image file (asynchronously).
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|loaded| {
                    log::info!("Loaded image: {} ({}x{})", path.display(), loaded.width, loaded.height);
                    LoadedImageData {
                        name: path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string()),
                        width: loaded.width,
                        height: loaded.height,
                        pixels: loaded.pixels,
                    }
                })
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);
        });
    }

    /// Install a finished background load. A rejected file leaves the current session alone.
    fn receive_image(&mut self, ctx: &egui::Context, now: f64) {
        let Some(receiver) = self.image_loader.as_ref() else {
            return;
        };
        let Some(result) = poll_loader(receiver) else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                let texture = ctx.load_texture("character_image", color_image, egui::TextureOptions::LINEAR);

                self.image_texture = Some(texture);
                self.drag.cancel();
                self.session.upload_image(SessionImage {
                    name: loaded.name,
                    width: loaded.width,
                    height: loaded.height,
                });
            }
            Err(e) => {
                log::error!("Image load failed: {}", e);
                self.set_notice(format!("Could not load image: {}", e), now);
            }
        }
    }

    fn set_notice(&mut self, text: String, now: f64) {
        self.notice = Some((text, now + self.config.notice_secs));
    }

    /// Turn session notices into status line messages.
    fn show_notices(&mut self, now: f64) {
        for notice in self.session.drain_notices() {
            let text = match notice {
                Notice::AnalysisComplete => "Analysis complete".to_string(),
                Notice::PointCorrected { label } => format!("{} corrected", label),
                Notice::PointActivated { label } => format!("{} relaxed", label),
                Notice::RoundComplete { total } => {
                    format!("Round complete! All {} points relaxed", total)
                }
            };
            log::info!("Notice: {}", text);
            self.set_notice(text, now);
        }
        if self.notice.as_ref().is_some_and(|(_, expires)| now >= *expires) {
            self.notice = None;
        }
    }

    fn handle_toolbar(&mut self, action: ToolbarAction, now: f64) {
        match action {
            ToolbarAction::ToggleEditing => {
                self.drag.cancel();
                self.session.toggle_editing(now);
            }
            ToolbarAction::ToggleMassage => {
                self.drag.cancel();
                self.session.toggle_massage(now);
            }
            ToolbarAction::StartRound => {
                self.session.start_round(now);
            }
            ToolbarAction::SelectLayer(kind) => {
                if self.session.select_layer(kind) {
                    self.drag.cancel();
                }
            }
            ToolbarAction::None => {}
        }
    }

    fn handle_canvas(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::MarkerDropped(index, pos) => {
                self.session.correct_point(index, pos.x, pos.y);
            }
            CanvasAction::MarkerClicked(index) => {
                if self.session.active_layer() == LayerKind::Massage {
                    self.session.activate_point(index);
                }
            }
            CanvasAction::None => {}
        }
    }

    /// Wake up for the next timer deadline even if there is no input.
    fn schedule_repaint(&self, ctx: &egui::Context, now: f64) {
        let deadlines = [
            self.session.next_deadline(now),
            self.notice.as_ref().map(|(_, expires)| *expires),
        ];
        if let Some(deadline) = deadlines.into_iter().flatten().reduce(f64::min) {
            ctx.request_repaint_after(Duration::from_secs_f64((deadline - now).max(0.0)));
        }
    }
}

/// Take a finished load off the channel. A loader thread that went away
/// without sending is reported as a failed load so the spinner stops.
fn poll_loader<T>(receiver: &Receiver<Result<T, String>>) -> Option<Result<T, String>> {
    match receiver.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err("image loader stopped unexpectedly".to_string())),
    }
}

impl eframe::App for AnatomyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        self.receive_image(ctx, now);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.session.tick(now);
        self.show_notices(now);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(self.image_loader.is_none(), egui::Button::new("Open Image..."))
                        .clicked()
                    {
                        self.open_image_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session))
            .inner;
        self.handle_toolbar(toolbar_action, now);

        // Character panel (left side)
        let loading = self.image_loader.is_some();
        let sidebar_action = egui::SidePanel::left("character")
            .default_width(280.0)
            .show(ctx, |ui| sidebar::show(ui, &mut self.session, now, loading))
            .inner;
        match sidebar_action {
            SidebarAction::OpenImage => self.open_image_dialog(),
            SidebarAction::Analyze => {
                self.drag.cancel();
                self.session.analyze(now);
            }
            SidebarAction::None => {}
        }

        // Main canvas (center)
        let notice = self.notice.as_ref().map(|(text, _)| text.clone());
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    Some(canvas::show(
                        ui,
                        &self.session,
                        &self.image_texture,
                        &mut self.drag,
                        notice.as_deref(),
                    ))
                }
            })
            .inner;

        if let Some(output) = output {
            self.handle_canvas(output);
        }

        egui::Window::new("About Anatomy Lens")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("The capybara mage studies your character's anatomy.");
                ui.label("Markers are placed by magic, not by measurement.");
            });

        self.schedule_repaint(ctx, now);
    }
}
