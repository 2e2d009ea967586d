use eframe::egui;
use egui::epaint::CircleShape;
use egui::{Color32, Pos2, Rect, Stroke};
use image::Rgba;

/// Smallest brush diameter in surface pixels.
pub const MIN_BRUSH_SIZE: u32 = 1;
/// Largest brush diameter in surface pixels.
pub const MAX_BRUSH_SIZE: u32 = 50;

/// The fixed brush palette offered by the controls panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BrushColor {
    #[default]
    White,
    Black,
    Red,
    Green,
    Blue,
    Yellow,
}

impl BrushColor {
    pub fn all() -> &'static [BrushColor] {
        &[
            BrushColor::White,
            BrushColor::Black,
            BrushColor::Red,
            BrushColor::Green,
            BrushColor::Blue,
            BrushColor::Yellow,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            BrushColor::White => "White",
            BrushColor::Black => "Black",
            BrushColor::Red => "Red",
            BrushColor::Green => "Green",
            BrushColor::Blue => "Blue",
            BrushColor::Yellow => "Yellow",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BrushColor::White => "#FFFFFF",
            BrushColor::Black => "#000000",
            BrushColor::Red => "#FF0000",
            BrushColor::Green => "#00FF00",
            BrushColor::Blue => "#0000FF",
            BrushColor::Yellow => "#FFFF00",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            BrushColor::White => [255, 255, 255],
            BrushColor::Black => [0, 0, 0],
            BrushColor::Red => [255, 0, 0],
            BrushColor::Green => [0, 255, 0],
            BrushColor::Blue => [0, 0, 255],
            BrushColor::Yellow => [255, 255, 0],
        }
    }

    /// Opaque pixel value written into the mask raster.
    pub fn to_rgba(&self) -> Rgba<u8> {
        let [r, g, b] = self.rgb();
        Rgba([r, g, b, 255])
    }

    pub fn to_color32(&self) -> Color32 {
        let [r, g, b] = self.rgb();
        Color32::from_rgb(r, g, b)
    }
}

/// Brush size and color, read by the stroke surface when a stroke begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushSettings {
    size: u32,
    color: BrushColor,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 5,
            color: BrushColor::White,
        }
    }
}

impl BrushSettings {
    pub fn new(size: i64, color: BrushColor) -> Self {
        let mut settings = Self::default();
        settings.set_size(size);
        settings.set_color(color);
        settings
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> BrushColor {
        self.color
    }

    /// Set the diameter, clamped to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`.
    pub fn set_size(&mut self, size: i64) {
        self.size = size.clamp(MIN_BRUSH_SIZE as i64, MAX_BRUSH_SIZE as i64) as u32;
    }

    pub fn set_color(&mut self, color: BrushColor) {
        self.color = color;
    }
}

/// Pointer position relative to the drawing surface, used only for the
/// brush indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorTracker {
    position: Pos2,
    over_surface: bool,
}

impl CursorTracker {
    /// Update from the pointer's screen position (`None` when the pointer is
    /// gone) and the surface's screen rect.
    pub fn track(&mut self, pointer: Option<Pos2>, surface_rect: Rect) {
        match pointer {
            Some(pos) if surface_rect.contains(pos) => {
                self.position = Pos2::new(pos.x - surface_rect.min.x, pos.y - surface_rect.min.y);
                self.over_surface = true;
            }
            _ => self.over_surface = false,
        }
    }

    pub fn is_over_surface(&self) -> bool {
        self.over_surface
    }

    /// The brush indicator: a half-transparent circle of the brush's diameter
    /// and color with a white rim, at the last tracked position.  `None`
    /// while the pointer is off the surface.
    pub fn indicator(&self, surface_rect: Rect, brush: &BrushSettings) -> Option<CircleShape> {
        if !self.over_surface {
            return None;
        }
        Some(CircleShape {
            center: surface_rect.min + self.position.to_vec2(),
            radius: brush.size() as f32 / 2.0,
            fill: brush.color().to_color32().gamma_multiply(0.5),
            stroke: Stroke::new(2.0, Color32::WHITE),
        })
    }

    /// The painter should belong to a foreground layer so the indicator sits
    /// above the strokes; painted shapes never take pointer input.
    pub fn paint_indicator(&self, painter: &egui::Painter, surface_rect: Rect, brush: &BrushSettings) {
        if let Some(circle) = self.indicator(surface_rect, brush) {
            painter.add(circle);
        }
    }
}
