// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with mode toggles and the layer selector.

use crate::models::{
    marker::LayerKind,
    session::{Round, Session},
};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    ToggleEditing,
    ToggleMassage,
    StartRound,
    SelectLayer(LayerKind),
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &Session) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Layers:");
        for kind in LayerKind::ALL {
            let enabled = kind != LayerKind::Massage || session.is_massaging();
            let selected = session.active_layer() == kind;
            if ui
                .add_enabled(enabled, egui::SelectableLabel::new(selected, kind.display_name()))
                .clicked()
            {
                action = ToolbarAction::SelectLayer(kind);
            }
        }

        ui.separator();

        // Modes only make sense once there are markers
        let ready = session.is_complete();
        if ui
            .add_enabled(ready, egui::SelectableLabel::new(session.is_editing(), "✏ Edit points"))
            .clicked()
        {
            action = ToolbarAction::ToggleEditing;
        }
        if ui
            .add_enabled(ready, egui::SelectableLabel::new(session.is_massaging(), "Massage"))
            .clicked()
        {
            action = ToolbarAction::ToggleMassage;
        }

        if let Some(round) = session.round() {
            let text = match round {
                Round::Waiting => "▶ Start round",
                Round::Running | Round::Ended => "⟲ Restart round",
            };
            if ui.button(text).clicked() {
                action = ToolbarAction::StartRound;
            }
            ui.label(format!(
                "Score: {}/{}",
                session.massage_score(),
                session.massage_total()
            ));
        }

        ui.separator();

        let hint = if session.is_editing() {
            "Drag a marker to where it belongs"
        } else if session.is_massaging() {
            "Click each point to relax it"
        } else if ready {
            "Pick a layer, or switch on a mode"
        } else {
            "Analyze a character to see its anatomy"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
