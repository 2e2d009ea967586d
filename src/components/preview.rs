use eframe::egui;
use egui::{Color32, Stroke, Vec2};

use super::{FRAME_ROUNDING, PANEL_BG, TextureSlot, contain_rect, full_uv};
use crate::image_source::ImageSource;
use crate::surface::StrokeSurface;

const PANE_WIDTH: f32 = 400.0;
const PANE_IMAGE_HEIGHT: f32 = 300.0;

/// "Original Image" and "Generated Mask" side by side.
#[derive(Default)]
pub struct PreviewSection {
    original: TextureSlot,
    mask: TextureSlot,
}

impl PreviewSection {
    pub fn show(&mut self, ui: &mut egui::Ui, source: &ImageSource, surface: &StrokeSurface) {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Image Preview").size(24.0).strong());
        });
        ui.add_space(16.0);

        let original = self
            .original
            .sync(ui.ctx(), "preview_original", source.generation(), source.pixels())
            .map(|t| (t.id(), t.size_vec2()));
        let mask = self
            .mask
            .sync(ui.ctx(), "preview_mask", surface.preview_generation(), surface.preview())
            .map(|t| (t.id(), t.size_vec2()));

        let total = PANE_WIDTH * 2.0 + 24.0;
        ui.horizontal(|ui| {
            ui.add_space(((ui.available_width() - total) / 2.0).max(0.0));
            pane(ui, "Original Image", original, "No image");
            ui.add_space(24.0);
            pane(ui, "Generated Mask", mask, "Start drawing to see mask preview");
        });
    }
}

fn pane(
    ui: &mut egui::Ui,
    title: &str,
    texture: Option<(egui::TextureId, Vec2)>,
    placeholder: &str,
) {
    egui::Frame::none()
        .fill(Color32::BLACK)
        .stroke(Stroke::new(2.0, PANEL_BG))
        .rounding(FRAME_ROUNDING)
        .show(ui, |ui| {
            ui.set_width(PANE_WIDTH);
            ui.vertical(|ui| {
                let (title_rect, _) =
                    ui.allocate_exact_size(Vec2::new(PANE_WIDTH, 32.0), egui::Sense::hover());
                ui.painter().rect_filled(title_rect, 0.0, PANEL_BG);
                ui.painter().text(
                    title_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    title,
                    egui::FontId::proportional(15.0),
                    Color32::WHITE,
                );

                let (body, _) = ui.allocate_exact_size(
                    Vec2::new(PANE_WIDTH, PANE_IMAGE_HEIGHT + 32.0),
                    egui::Sense::hover(),
                );
                let inner = body.shrink(16.0);
                match texture {
                    Some((id, size)) => {
                        ui.painter().image(id, contain_rect(size, inner), full_uv(), Color32::WHITE);
                    }
                    None => {
                        ui.painter().text(
                            inner.center(),
                            egui::Align2::CENTER_CENTER,
                            placeholder,
                            egui::FontId::proportional(14.0),
                            Color32::WHITE,
                        );
                    }
                }
            });
        });
}
