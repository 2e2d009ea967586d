use eframe::egui;
use egui::{Color32, Sense, Stroke, Vec2};

use super::{FRAME_ROUNDING, PAGE_BG, PANEL_BG};

/// What the uploader pane asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploaderAction {
    PickFile,
}

/// The "no image yet" pane: a drop target with an upload button and an empty
/// controls placeholder beside it.
pub fn show_uploader(ui: &mut egui::Ui, uploading: bool) -> Option<UploaderAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        let (rect, response) = ui.allocate_exact_size(Vec2::new(800.0, 500.0), Sense::click());
        let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let border = if hovering_files { Color32::from_rgb(0x60, 0xa5, 0xfa) } else { PAGE_BG };
        ui.painter().rect_filled(rect, FRAME_ROUNDING, Color32::BLACK);
        ui.painter().rect_stroke(rect, FRAME_ROUNDING, Stroke::new(2.0, border));

        let mut content = ui.child_ui(rect, egui::Layout::top_down(egui::Align::Center));
        content.add_space(rect.height() / 2.0 - 40.0);
        if uploading {
            content.spinner();
            content.label(egui::RichText::new("Uploading…").color(Color32::WHITE));
        } else {
            content.label(
                egui::RichText::new("Drag and Drop an image here or select a file")
                    .color(Color32::WHITE),
            );
            content.add_space(16.0);
            let button = egui::Button::new(
                egui::RichText::new("Click here to Upload").color(Color32::WHITE),
            )
            .fill(PANEL_BG)
            .rounding(20.0)
            .min_size(Vec2::new(180.0, 36.0));
            if content.add(button).clicked() {
                action = Some(UploaderAction::PickFile);
            }
        }
        if response.clicked() && !uploading {
            action = Some(UploaderAction::PickFile);
        }

        ui.add_space(24.0);
        let (side, _) = ui.allocate_exact_size(Vec2::new(300.0, 500.0), Sense::hover());
        ui.painter().rect_filled(side, FRAME_ROUNDING, PAGE_BG);
        ui.painter().rect_stroke(side, FRAME_ROUNDING, Stroke::new(2.0, PANEL_BG));
    });

    action
}
