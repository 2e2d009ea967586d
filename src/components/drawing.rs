use eframe::egui;
use egui::{Color32, Id, LayerId, Order, Pos2, Rect, Sense, Shape, Vec2};

use super::{FRAME_ROUNDING, PANEL_BG, TextureSlot, contain_rect, full_uv};
use crate::brush::{BrushSettings, CursorTracker};
use crate::image_source::ImageSource;
use crate::surface::{Stroke, StrokeSurface};

/// Declared size of the drawing surface (and of every exported mask).
pub const SURFACE_WIDTH: u32 = 800;
pub const SURFACE_HEIGHT: u32 = 500;

/// Map a screen position inside `frame` to surface coordinates.  The frame
/// may be displayed at any size; the surface keeps its declared size.
pub fn screen_to_surface(pos: Pos2, frame: Rect, surface: (u32, u32)) -> (f32, f32) {
    let sx = surface.0 as f32 / frame.width().max(f32::EPSILON);
    let sy = surface.1 as f32 / frame.height().max(f32::EPSILON);
    ((pos.x - frame.min.x) * sx, (pos.y - frame.min.y) * sy)
}

fn surface_to_screen(point: (f32, f32), frame: Rect, scale: Vec2) -> Pos2 {
    Pos2::new(frame.min.x + point.0 * scale.x, frame.min.y + point.1 * scale.y)
}

/// The image frame with the stroke layer and brush indicator on top.
#[derive(Default)]
pub struct DrawingView {
    cursor: CursorTracker,
    image_texture: TextureSlot,
}

impl DrawingView {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        source: &ImageSource,
        surface: &mut StrokeSurface,
        brush: &BrushSettings,
    ) {
        surface.mount(SURFACE_WIDTH, SURFACE_HEIGHT);
        let size = (SURFACE_WIDTH, SURFACE_HEIGHT);

        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(SURFACE_WIDTH as f32, SURFACE_HEIGHT as f32),
            Sense::drag(),
        );
        let interactive = ui.is_enabled();

        // -- Input ---------------------------------------------------------
        if interactive {
            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    surface.begin_stroke(screen_to_surface(pos, rect, size), brush);
                }
            } else if response.dragged()
                && let Some(pos) = response.interact_pointer_pos()
            {
                surface.extend_stroke(screen_to_surface(pos, rect, size));
            }
        }
        if response.drag_released() || (!interactive && surface.is_stroke_active()) {
            surface.end_stroke();
        }

        // -- Image ---------------------------------------------------------
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, FRAME_ROUNDING, Color32::BLACK);
        if let Some(pixels) = source.pixels()
            && let Some(texture) =
                self.image_texture
                    .sync(ui.ctx(), "source_image", source.generation(), Some(pixels))
        {
            let image_size = Vec2::new(pixels.width() as f32, pixels.height() as f32);
            painter.image(texture.id(), contain_rect(image_size, rect), full_uv(), Color32::WHITE);
        }
        painter.rect_filled(rect, FRAME_ROUNDING, Color32::from_white_alpha(25));

        // -- Strokes -------------------------------------------------------
        let scale = Vec2::new(rect.width() / size.0 as f32, rect.height() / size.1 as f32);
        for stroke in surface.strokes().iter().chain(surface.current_stroke()) {
            paint_stroke(&painter, stroke, rect, scale);
        }
        painter.rect_stroke(rect, FRAME_ROUNDING, egui::Stroke::new(2.0, PANEL_BG));

        // -- Brush indicator -------------------------------------------------
        let hover = if interactive {
            ui.input(|i| i.pointer.hover_pos())
        } else {
            None
        };
        self.cursor.track(hover, rect);
        let overlay = ui
            .ctx()
            .layer_painter(LayerId::new(Order::Foreground, Id::new("brush_indicator")))
            .with_clip_rect(rect);
        self.cursor.paint_indicator(&overlay, rect, brush);
    }
}

/// Vector rendering of one stroke: a polyline plus a disc at every vertex for
/// round caps and joins, matching the rasterized mask.
fn paint_stroke(painter: &egui::Painter, stroke: &Stroke, frame: Rect, scale: Vec2) {
    let color = stroke.color().to_color32();
    let width = stroke.width() as f32 * scale.x;
    let points: Vec<Pos2> = stroke
        .points()
        .iter()
        .map(|p| surface_to_screen(*p, frame, scale))
        .collect();

    if points.len() > 1 {
        painter.add(Shape::line(points.clone(), egui::Stroke::new(width, color)));
    }
    for point in points {
        painter.circle_filled(point, width / 2.0, color);
    }
}
