pub mod controls;
pub mod drawing;
pub mod notification;
pub mod preview;
pub mod uploader;

use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, TextureOptions, Vec2};
use image::RgbaImage;

/// Page background.
pub const PAGE_BG: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x27);
/// Panel background / border.
pub const PANEL_BG: Color32 = Color32::from_rgb(0x2a, 0x2a, 0x37);
/// Rounding used by the large frames.
pub const FRAME_ROUNDING: f32 = 24.0;

/// Largest rect with `content`'s aspect ratio that fits centered in `frame`.
pub fn contain_rect(content: Vec2, frame: Rect) -> Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return Rect::from_center_size(frame.center(), Vec2::ZERO);
    }
    let scale = (frame.width() / content.x).min(frame.height() / content.y);
    Rect::from_center_size(frame.center(), content * scale)
}

/// Full-texture UV rect.
pub fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

/// Converts an RgbaImage to egui's ColorImage format
pub fn rgba_image_to_color_image(img: &RgbaImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    let color_pixels: Vec<Color32> = img
        .as_raw()
        .chunks_exact(4)
        .map(|chunk| Color32::from_rgba_unmultiplied(chunk[0], chunk[1], chunk[2], chunk[3]))
        .collect();

    ColorImage {
        size,
        pixels: color_pixels,
    }
}

/// A GPU texture that is rebuilt only when its source generation changes.
#[derive(Default)]
pub struct TextureSlot {
    texture: Option<egui::TextureHandle>,
    built_generation: Option<u64>,
}

impl TextureSlot {
    /// Make the texture reflect `image` as of `generation`.  `None` drops it.
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        generation: u64,
        image: Option<&RgbaImage>,
    ) -> Option<&egui::TextureHandle> {
        if self.built_generation != Some(generation) {
            self.built_generation = Some(generation);
            self.texture = image.map(|img| {
                ctx.load_texture(name, rgba_image_to_color_image(img), TextureOptions::LINEAR)
            });
        }
        self.texture.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_fits_wide_image_to_width() {
        let frame = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 500.0));
        let fitted = contain_rect(Vec2::new(1600.0, 400.0), frame);
        assert_eq!(fitted.width(), 800.0);
        assert_eq!(fitted.height(), 200.0);
        assert_eq!(fitted.center(), frame.center());
    }

    #[test]
    fn contain_scales_small_image_up() {
        let frame = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 500.0));
        let fitted = contain_rect(Vec2::new(10.0, 10.0), frame);
        assert_eq!(fitted.width(), 500.0);
        assert_eq!(fitted.height(), 500.0);
    }

    #[test]
    fn color_image_keeps_unmultiplied_pixels() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        let color = rgba_image_to_color_image(&img);
        assert_eq!(color.size, [3, 2]);
        assert!(color.pixels.iter().all(|p| *p == Color32::RED));
    }
}
