// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Anatomy marker overlay.
//!
//! A marker is a dot anchored at a container-relative pixel position with
//! its label above and a short leader line below. Markers can be dragged
//! (edit mode) or clicked (massage mode).
//!
//! Dragging is held in a [`DragTracker`] owned by the app. While a drag
//! session is held the global pointer position is followed, so the
//! pointer may leave the marker. The committed position only changes
//! when the pointer is released.

use crate::models::marker::ContainerSize;
use crate::util::geometry;

const DOT_RADIUS: f32 = 8.0;
const LEADER_LENGTH: f32 = 48.0;
const HIT_SIZE: f32 = 28.0;

const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(6, 182, 212);
const FOUND_COLOR: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);

/// The marker currently being dragged.
#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    id: egui::Id,
    start: egui::Pos2,
    candidate: egui::Pos2,
}

/// Holds at most one drag session across all markers.
#[derive(Debug, Default)]
pub struct DragTracker {
    session: Option<DragSession>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging the marker `id` currently stored at `start` (container-relative).
    pub fn begin(&mut self, id: egui::Id, start: egui::Pos2) {
        self.session = Some(DragSession {
            id,
            start,
            candidate: start,
        });
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_dragging(&self, id: egui::Id) -> bool {
        self.session.as_ref().is_some_and(|s| s.id == id)
    }

    /// Uncommitted position of the marker `id`, while it is dragged.
    pub fn candidate(&self, id: egui::Id) -> Option<egui::Pos2> {
        self.session
            .as_ref()
            .filter(|s| s.id == id)
            .map(|s| s.candidate)
    }

    /// Follow the pointer (screen space) over a container drawn at `rect`.
    /// Without a container or pointer nothing moves.
    pub fn update(&mut self, pointer: Option<egui::Pos2>, rect: Option<egui::Rect>, size: ContainerSize) {
        let (Some(session), Some(pointer), Some(rect)) = (self.session.as_mut(), pointer, rect) else {
            return;
        };
        session.candidate = geometry::clamp_to_container(geometry::to_container(pointer, rect, size), size);
    }

    /// End the drag of `id`. Returns the final clamped position if the marker moved.
    pub fn finish(&mut self, id: egui::Id) -> Option<egui::Pos2> {
        if !self.is_dragging(id) {
            return None;
        }
        let session = self.session.take()?;
        (session.candidate != session.start).then_some(session.candidate)
    }

    /// Drop any drag session without reporting it.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Cancelled drag of {:?}", session.id);
        }
    }

    /// Cancel a session whose pointer has been released without the marker seeing it,
    /// e.g. because the marker was not drawn this frame.
    pub fn release_if_idle(&mut self, pointer_down: bool) {
        if !pointer_down {
            self.cancel();
        }
    }
}

/// A marker to draw.
pub struct Marker<'a> {
    /// Container-relative position
    pub pos: egui::Pos2,
    pub label: &'a str,
    pub draggable: bool,
    /// Found/confirmed
    pub active: bool,
}

/// Result of marker interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerEvent {
    None,
    Clicked,
    /// Drag released at this container-relative position
    Dropped(egui::Pos2),
}

/// Draw a marker over a container of `size` drawn at `rect` (screen) and handle its interaction.
pub fn show(
    ui: &mut egui::Ui,
    id: egui::Id,
    marker: &Marker,
    rect: egui::Rect,
    size: ContainerSize,
    drag: &mut DragTracker,
) -> MarkerEvent {
    let shown_at = drag.candidate(id).unwrap_or(marker.pos);
    let hit_rect = egui::Rect::from_center_size(
        geometry::to_screen(shown_at, rect, size),
        egui::vec2(HIT_SIZE, HIT_SIZE),
    );
    let sense = if marker.draggable {
        egui::Sense::click_and_drag()
    } else {
        egui::Sense::click()
    };
    let response = ui.interact(hit_rect, id, sense);

    let mut event = MarkerEvent::None;
    let mut was_dragging = false;

    if marker.draggable {
        if response.drag_started() || (response.dragged() && !drag.is_dragging(id)) {
            drag.begin(id, marker.pos);
        }
        if drag.is_dragging(id) {
            was_dragging = true;
            let pointer = ui.input(|i| i.pointer.latest_pos());
            drag.update(pointer, Some(rect), size);

            let released = response.drag_stopped() || !ui.input(|i| i.pointer.primary_down());
            if released {
                if let Some(pos) = drag.finish(id) {
                    event = MarkerEvent::Dropped(pos);
                }
            }
        }
    }

    if response.clicked() && !was_dragging {
        event = MarkerEvent::Clicked;
    }

    if drag.is_dragging(id) {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if response.hovered() {
        ui.ctx().set_cursor_icon(if marker.draggable {
            egui::CursorIcon::Grab
        } else {
            egui::CursorIcon::PointingHand
        });
    }

    let pos = match event {
        MarkerEvent::Dropped(pos) => pos,
        _ => drag.candidate(id).unwrap_or(marker.pos),
    };
    paint(ui, marker, geometry::to_screen(pos, rect, size), drag.is_dragging(id));

    event
}

fn paint(ui: &egui::Ui, marker: &Marker, center: egui::Pos2, dragging: bool) {
    let painter = ui.painter();
    let color = if marker.active { FOUND_COLOR } else { MARKER_COLOR };

    let radius = if dragging {
        DOT_RADIUS * 1.5
    } else if marker.active {
        DOT_RADIUS
    } else {
        // Idle pulse
        let t = ui.input(|i| i.time) as f32;
        DOT_RADIUS * (1.0 + 0.12 * (t * 3.0).sin())
    };

    // Leader line
    painter.line_segment(
        [center, center + egui::vec2(0.0, LEADER_LENGTH)],
        egui::Stroke::new(2.0, color),
    );

    if dragging {
        painter.circle_filled(center + egui::vec2(2.0, 4.0), radius, egui::Color32::from_black_alpha(90));
    }
    painter.circle_filled(center, radius, color);
    painter.circle_stroke(center, radius, egui::Stroke::new(1.0, egui::Color32::WHITE));

    if marker.active {
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "✔",
            egui::FontId::proportional(radius * 1.2),
            egui::Color32::WHITE,
        );
    }

    // Label box above the dot
    let font = egui::FontId::proportional(if dragging { 14.0 } else { 12.0 });
    let galley = painter.layout_no_wrap(marker.label.to_owned(), font, egui::Color32::BLACK);
    let text_rect = egui::Align2::CENTER_BOTTOM
        .anchor_size(center - egui::vec2(0.0, radius + 6.0), galley.size());
    painter.rect_filled(text_rect.expand(4.0), 4.0, egui::Color32::WHITE);
    painter.galley(text_rect.min, galley, egui::Color32::BLACK);
}
