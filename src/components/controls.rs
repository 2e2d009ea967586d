use eframe::egui;
use egui::{Color32, Sense, Stroke, Vec2};

use super::{FRAME_ROUNDING, PAGE_BG, PANEL_BG};
use crate::brush::{BrushColor, BrushSettings, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

/// Button pressed in the controls panel this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlsAction {
    Clear,
    Export,
    ChangeImage,
}

const PANEL_SIZE: Vec2 = Vec2::new(300.0, 500.0);

/// Brush size slider, palette, and the Clear / Export / Change Image buttons.
pub fn show_controls(
    ui: &mut egui::Ui,
    brush: &mut BrushSettings,
    export_in_flight: bool,
) -> Option<ControlsAction> {
    let mut action = None;

    egui::Frame::none()
        .fill(PAGE_BG)
        .stroke(Stroke::new(2.0, PANEL_BG))
        .rounding(FRAME_ROUNDING)
        .inner_margin(24.0)
        .show(ui, |ui| {
            ui.set_min_size(PANEL_SIZE - Vec2::splat(48.0));
            ui.set_max_width(PANEL_SIZE.x - 48.0);

            ui.label(egui::RichText::new("✏ Brush Size").size(18.0).strong());
            ui.add_space(8.0);
            let mut size = brush.size() as i64;
            if ui
                .add(
                    egui::Slider::new(&mut size, MIN_BRUSH_SIZE as i64..=MAX_BRUSH_SIZE as i64)
                        .show_value(false),
                )
                .changed()
            {
                brush.set_size(size);
            }
            ui.label(format!("Size: {}", brush.size()));

            ui.add_space(20.0);
            ui.label(egui::RichText::new("Brush Color").size(18.0).strong());
            ui.add_space(8.0);
            egui::Grid::new("brush_palette")
                .num_columns(3)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (i, color) in BrushColor::all().iter().enumerate() {
                        if palette_swatch(ui, *color, brush.color() == *color) {
                            brush.set_color(*color);
                        }
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(24.0);
            let button_size = Vec2::new(ui.available_width(), 40.0);
            if ui
                .add_sized(button_size, egui::Button::new("🗑 Clear Canvas").rounding(20.0))
                .clicked()
            {
                action = Some(ControlsAction::Clear);
            }
            ui.add_space(8.0);
            let export_label = if export_in_flight { "⏳ Exporting…" } else { "⬇ Export Mask" };
            if ui
                .add_sized(button_size, egui::Button::new(export_label).rounding(20.0))
                .clicked()
            {
                action = Some(ControlsAction::Export);
            }
            ui.add_space(8.0);
            if ui
                .add_sized(button_size, egui::Button::new("🖼 Change Image").rounding(20.0))
                .clicked()
            {
                action = Some(ControlsAction::ChangeImage);
            }
        });

    action
}

/// One round palette swatch.  Returns true when clicked.
fn palette_swatch(ui: &mut egui::Ui, color: BrushColor, selected: bool) -> bool {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(68.0, 36.0), Sense::click());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let shown = if response.hovered() && !selected {
            rect.expand(2.0)
        } else {
            rect
        };
        painter.rect_filled(shown, 18.0, color.to_color32());
        if selected {
            painter.rect_stroke(
                rect.expand(4.0),
                20.0,
                Stroke::new(2.0, Color32::from_rgb(0x60, 0xa5, 0xfa)),
            );
        }
    }

    response
        .on_hover_text(format!("{} {}", color.label(), color.hex()))
        .clicked()
}
