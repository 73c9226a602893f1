// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image canvas with the marker overlay.
//!
//! This module fits the character image into the central area and draws
//! the markers of the active layer on top of it.

use super::marker::{self, DragTracker, Marker, MarkerEvent};
use crate::models::{
    marker::LayerKind,
    session::{Mode, Round, Session},
};
use std::time::Duration;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Marker of the active layer clicked
    MarkerClicked(usize),
    /// Marker of the active layer dropped at a container-relative position
    MarkerDropped(usize, egui::Pos2),
}

/// Display the canvas area and handle marker interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    image_texture: &Option<egui::TextureHandle>,
    drag: &mut DragTracker,
    notice: Option<&str>,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    // Leave room for the status line
    let available_size = ui.available_size() - egui::vec2(0.0, 28.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        match (image_texture, session.container()) {
            (Some(texture), Some(size)) => {
                // Markers live in image pixels; the fitted rect only scales them
                let image_rect = fit_rect(ui.min_rect().min, available_size, size.width, size.height);

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                let layer = session.active_layer();
                let draggable = session.is_editing();
                for (index, point) in session.active_points().iter().enumerate() {
                    let marker = Marker {
                        pos: egui::pos2(point.x, point.y),
                        label: &point.label,
                        draggable,
                        active: layer == LayerKind::Massage && point.is_found,
                    };
                    let id = egui::Id::new(("anatomy_marker", layer, index));
                    match marker::show(ui, id, &marker, image_rect, size, drag) {
                        MarkerEvent::Clicked => action = CanvasAction::MarkerClicked(index),
                        MarkerEvent::Dropped(pos) => action = CanvasAction::MarkerDropped(index, pos),
                        MarkerEvent::None => {}
                    }
                }

                if !session.active_points().is_empty() {
                    // Keep the idle pulse animating
                    ui.ctx().request_repaint_after(Duration::from_millis(33));
                }
            }
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("Anatomy Lens")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new("The capybara mage studies your character")
                                .size(14.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Upload a full-height image of your character")
                                .color(egui::Color32::from_gray(180)),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new("File → Open Image...")
                                .weak()
                                .color(egui::Color32::from_gray(130)),
                        );
                    });
                });
            }
        }
    });

    // A drag whose marker was not drawn this frame still ends on release
    let pointer_down = ui.input(|i| i.pointer.primary_down());
    drag.release_if_idle(pointer_down);

    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Layer: {}", session.active_layer().display_name()));
        ui.separator();
        ui.label(mode_text(session.mode()));
        if let Some(text) = notice {
            ui.separator();
            ui.label(egui::RichText::new(text).strong());
        }
    });

    action
}

fn mode_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Viewing => "Viewing",
        Mode::Editing => "Editing: drag markers to correct them",
        Mode::Massaging(Round::Waiting) => "Massage: start a round",
        Mode::Massaging(Round::Running) => "Massage: click every point",
        Mode::Massaging(Round::Ended) => "Massage: round complete",
    }
}

/// Largest rect with the image's aspect ratio that fits `available`, centered.
pub fn fit_rect(origin: egui::Pos2, available: egui::Vec2, img_width: f32, img_height: f32) -> egui::Rect {
    let img_aspect = img_width / img_height;
    let available_aspect = available.x / available.y;

    let (display_width, display_height) = if img_aspect > available_aspect {
        // Image is wider - fit to width
        (available.x, available.x / img_aspect)
    } else {
        // Image is taller - fit to height
        (available.y * img_aspect, available.y)
    };

    let x_offset = (available.x - display_width) / 2.0;
    let y_offset = (available.y - display_height) / 2.0;

    egui::Rect::from_min_size(
        origin + egui::vec2(x_offset, y_offset),
        egui::vec2(display_width, display_height),
    )
}
