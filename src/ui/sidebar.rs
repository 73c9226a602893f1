// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel with the character inputs and the mage's commentary.

use crate::models::session::Session;

/// Result of side panel interaction.
pub enum SidebarAction {
    None,
    OpenImage,
    Analyze,
}

/// Display the side panel.
pub fn show(ui: &mut egui::Ui, session: &mut Session, now: f64, loading: bool) -> SidebarAction {
    let mut action = SidebarAction::None;

    ui.heading("Character");
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui.add_enabled(!loading, egui::Button::new("Choose image...")).clicked() {
            action = SidebarAction::OpenImage;
        }
        match session.image() {
            Some(image) => ui.label(egui::RichText::new(&image.name).weak()),
            None => ui.label(egui::RichText::new("no image").weak()),
        };
    });

    ui.add_space(8.0);
    ui.label("Features");
    ui.add(
        egui::TextEdit::multiline(session.features_mut())
            .hint_text("Build, proportions, gear...")
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(8.0);
    let analyzing = session.is_analyzing();
    ui.horizontal(|ui| {
        let text = if analyzing {
            "The capybara is analyzing..."
        } else {
            "Study anatomy"
        };
        if ui
            .add_enabled(session.can_analyze(), egui::Button::new(text))
            .clicked()
        {
            action = SidebarAction::Analyze;
        }
        if analyzing {
            ui.spinner();
        }
    });

    if let Some(tool) = session.current_tool(now) {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(format!("Using: {}", tool)).color(egui::Color32::LIGHT_BLUE));
    }

    if let Some(quote) = session.quote() {
        ui.add_space(12.0);
        ui.separator();
        ui.label(egui::RichText::new("The mage says:").small().weak());
        ui.label(egui::RichText::new(format!("“{}”", quote)).italics());
    }

    action
}
