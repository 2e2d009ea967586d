// ============================================================================
// STROKE SURFACE: freehand stroke capture and mask rasterization
// ============================================================================
//
// Strokes are kept as polylines in surface coordinates (1 unit = 1 mask
// pixel).  The rendered mask is never patched incrementally: every mutation
// rebuilds it from the full stroke list, so the preview always equals what an
// export would produce at that moment.

use image::{Rgba, RgbaImage};

use crate::brush::{BrushColor, BrushSettings};
use crate::error::{Error, Result};

/// Fully transparent mask pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixel centers are sampled this far toward the top-left so coverage is
/// half-open: a stroke of width `w` through integer coordinates covers
/// exactly `w` rows (or columns), not `w + 1`.
const COVERAGE_BIAS: f32 = 1.0 / 1024.0;

/// One freehand stroke: its points plus the brush that drew it.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<(f32, f32)>,
    color: BrushColor,
    width: u32,
}

impl Stroke {
    fn new(start: (f32, f32), brush: &BrushSettings) -> Self {
        Self {
            points: vec![start],
            color: brush.color(),
            width: brush.size(),
        }
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    pub fn color(&self) -> BrushColor {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

pub struct StrokeSurface {
    /// Declared pixel size; `None` until the drawing view mounts the surface.
    size: Option<(u32, u32)>,
    /// Finished strokes in insertion order.
    strokes: Vec<Stroke>,
    /// Stroke currently under the pointer.
    current: Option<Stroke>,
    /// Cached rendered mask shown in the preview pane.
    preview: Option<RgbaImage>,
    /// Bumped on every preview change so views know when to re-upload.
    preview_generation: u64,
}

impl Default for StrokeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeSurface {
    pub fn new() -> Self {
        Self {
            size: None,
            strokes: Vec::new(),
            current: None,
            preview: None,
            preview_generation: 0,
        }
    }

    /// Declare the surface's pixel size.  Re-mounting at a new size
    /// re-renders the preview for the new dimensions.
    pub fn mount(&mut self, width: u32, height: u32) {
        if self.size == Some((width, height)) {
            return;
        }
        self.size = Some((width, height));
        if self.preview.is_some() {
            self.refresh_preview();
        }
    }

    /// Tear the surface down, discarding all strokes.
    pub fn unmount(&mut self) {
        self.clear();
        self.size = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.size.is_some()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_stroke_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.current.is_none()
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    /// Start a stroke with the brush's current size and color.  Ignored when
    /// the surface is not mounted.  A stroke still in progress is finished
    /// first.
    pub fn begin_stroke(&mut self, point: (f32, f32), brush: &BrushSettings) {
        if !self.is_mounted() {
            return;
        }
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
        self.current = Some(Stroke::new(point, brush));
    }

    /// Append a point to the stroke in progress.  Repeating the last point
    /// changes nothing and does not re-render.
    pub fn extend_stroke(&mut self, point: (f32, f32)) {
        let Some(stroke) = self.current.as_mut() else {
            return;
        };
        if stroke.points.last() == Some(&point) {
            return;
        }
        stroke.points.push(point);
        self.refresh_preview();
    }

    pub fn end_stroke(&mut self) {
        let Some(stroke) = self.current.take() else {
            return;
        };
        self.strokes.push(stroke);
        self.refresh_preview();
    }

    /// Drop every stroke and the cached mask in one step.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.preview = None;
        self.preview_generation += 1;
    }

    /// Render all strokes, oldest first, onto a transparent buffer of the
    /// surface's declared size.  The in-progress stroke is painted last.
    pub fn rasterize(&self) -> Result<RgbaImage> {
        let (width, height) = self.size.ok_or(Error::SurfaceNotReady)?;
        let mut mask = RgbaImage::from_pixel(width, height, TRANSPARENT);
        for stroke in self.strokes.iter().chain(self.current.iter()) {
            paint_stroke(&mut mask, stroke);
        }
        Ok(mask)
    }

    fn refresh_preview(&mut self) {
        self.preview = self.rasterize().ok();
        self.preview_generation += 1;
    }
}

/// Paint a stroke with round caps and joins: every pixel whose (biased)
/// center lies strictly within half the stroke width of the polyline takes
/// the stroke color.
fn paint_stroke(target: &mut RgbaImage, stroke: &Stroke) {
    let radius = stroke.width as f32 / 2.0;
    let pixel = stroke.color.to_rgba();
    match stroke.points.as_slice() {
        [] => {}
        [only] => paint_segment(target, *only, *only, radius, pixel),
        points => {
            for pair in points.windows(2) {
                paint_segment(target, pair[0], pair[1], radius, pixel);
            }
        }
    }
}

fn paint_segment(target: &mut RgbaImage, a: (f32, f32), b: (f32, f32), radius: f32, pixel: Rgba<u8>) {
    let (width, height) = target.dimensions();
    let min_x = (a.0.min(b.0) - radius).floor().clamp(0.0, width as f32) as u32;
    let max_x = (a.0.max(b.0) + radius).ceil().clamp(0.0, width as f32) as u32;
    let min_y = (a.1.min(b.1) - radius).floor().clamp(0.0, height as f32) as u32;
    let max_y = (a.1.max(b.1) + radius).ceil().clamp(0.0, height as f32) as u32;

    let radius_sq = radius * radius;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let center = (x as f32 + 0.5 - COVERAGE_BIAS, y as f32 + 0.5 - COVERAGE_BIAS);
            if distance_sq_to_segment(center, a, b) < radius_sq {
                target.put_pixel(x, y, pixel);
            }
        }
    }
}

fn distance_sq_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq < f32::EPSILON {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + dx * t, a.1 + dy * t);
    (p.0 - cx) * (p.0 - cx) + (p.1 - cy) * (p.1 - cy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(width: u32, height: u32) -> StrokeSurface {
        let mut surface = StrokeSurface::new();
        surface.mount(width, height);
        surface
    }

    fn is_transparent(mask: &RgbaImage) -> bool {
        mask.pixels().all(|p| p[3] == 0)
    }

    #[test]
    fn unmounted_surface_ignores_strokes_and_refuses_to_rasterize() {
        let mut surface = StrokeSurface::new();
        surface.begin_stroke((5.0, 5.0), &BrushSettings::default());
        assert!(!surface.is_stroke_active());
        surface.extend_stroke((10.0, 10.0));
        surface.end_stroke();
        assert!(surface.strokes().is_empty());
        assert!(matches!(surface.rasterize(), Err(Error::SurfaceNotReady)));
    }

    #[test]
    fn extend_and_end_without_stroke_are_no_ops() {
        let mut surface = mounted(20, 20);
        let generation = surface.preview_generation();
        surface.extend_stroke((1.0, 1.0));
        surface.end_stroke();
        assert!(surface.strokes().is_empty());
        assert!(surface.preview().is_none());
        assert_eq!(surface.preview_generation(), generation);
    }

    #[test]
    fn white_stroke_paints_along_its_path_only() {
        let mut surface = mounted(800, 500);
        let brush = BrushSettings::new(5, BrushColor::White);
        surface.begin_stroke((10.0, 10.0), &brush);
        surface.extend_stroke((50.0, 10.0));
        surface.end_stroke();

        let mask = surface.rasterize().unwrap();
        let white = Rgba([255, 255, 255, 255]);
        for x in [10, 20, 30, 40, 50] {
            assert_eq!(*mask.get_pixel(x, 10), white, "x = {x}");
        }
        assert_eq!(*mask.get_pixel(30, 8), white);
        assert_eq!(*mask.get_pixel(30, 20), TRANSPARENT);
        assert_eq!(*mask.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*mask.get_pixel(60, 10), TRANSPARENT);
        assert_eq!(*mask.get_pixel(400, 250), TRANSPARENT);

        for (x, y, p) in mask.enumerate_pixels() {
            if p[3] != 0 {
                assert_eq!(*p, white);
                let d = distance_sq_to_segment((x as f32 + 0.5, y as f32 + 0.5), (10.0, 10.0), (50.0, 10.0));
                assert!(d <= 2.5 * 2.5 + 0.01);
            }
        }
    }

    fn painted_rows_at(mask: &RgbaImage, x: u32) -> Vec<u32> {
        (0..mask.height()).filter(|&y| mask.get_pixel(x, y)[3] != 0).collect()
    }

    #[test]
    fn horizontal_stroke_covers_exactly_its_width() {
        for (width, rows) in [(1, 250..251), (5, 248..253), (50, 225..275)] {
            let mut surface = mounted(800, 500);
            surface.begin_stroke((100.0, 250.0), &BrushSettings::new(width, BrushColor::White));
            surface.extend_stroke((700.0, 250.0));
            surface.end_stroke();

            let mask = surface.rasterize().unwrap();
            assert_eq!(painted_rows_at(&mask, 400), rows.collect::<Vec<_>>(), "width {width}");
        }
    }

    #[test]
    fn vertical_stroke_covers_exactly_its_width() {
        let mut surface = mounted(100, 100);
        surface.begin_stroke((40.0, 10.0), &BrushSettings::new(5, BrushColor::Red));
        surface.extend_stroke((40.0, 90.0));
        surface.end_stroke();

        let mask = surface.rasterize().unwrap();
        let columns: Vec<u32> = (0..100).filter(|&x| mask.get_pixel(x, 50)[3] != 0).collect();
        assert_eq!(columns, vec![38, 39, 40, 41, 42]);
    }

    #[test]
    fn repeated_point_does_not_rerender() {
        let mut surface = mounted(50, 50);
        surface.begin_stroke((5.0, 5.0), &BrushSettings::default());
        surface.extend_stroke((20.0, 5.0));
        let generation = surface.preview_generation();

        surface.extend_stroke((20.0, 5.0));
        surface.extend_stroke((20.0, 5.0));
        assert_eq!(surface.preview_generation(), generation);
        assert_eq!(surface.current_stroke().unwrap().points(), &[(5.0, 5.0), (20.0, 5.0)]);

        surface.extend_stroke((30.0, 5.0));
        assert!(surface.preview_generation() > generation);
    }

    #[test]
    fn rasterize_is_deterministic() {
        let mut surface = mounted(64, 64);
        let mut brush = BrushSettings::new(7, BrushColor::Red);
        surface.begin_stroke((3.0, 4.0), &brush);
        surface.extend_stroke((40.5, 12.25));
        surface.extend_stroke((20.0, 60.0));
        surface.end_stroke();
        brush.set_color(BrushColor::Blue);
        brush.set_size(3);
        surface.begin_stroke((60.0, 2.0), &brush);
        surface.extend_stroke((1.0, 33.0));

        let first = surface.rasterize().unwrap();
        let second = surface.rasterize().unwrap();
        assert_eq!(first, second);
        assert_eq!(surface.preview(), Some(&first));
    }

    #[test]
    fn later_strokes_paint_over_earlier_ones() {
        let mut surface = mounted(40, 40);
        surface.begin_stroke((5.0, 20.0), &BrushSettings::new(9, BrushColor::Red));
        surface.extend_stroke((35.0, 20.0));
        surface.end_stroke();
        surface.begin_stroke((20.0, 5.0), &BrushSettings::new(9, BrushColor::Green));
        surface.extend_stroke((20.0, 35.0));
        surface.end_stroke();

        let mask = surface.rasterize().unwrap();
        assert_eq!(*mask.get_pixel(20, 20), BrushColor::Green.to_rgba());
        assert_eq!(*mask.get_pixel(8, 20), BrushColor::Red.to_rgba());
    }

    #[test]
    fn stroke_records_brush_at_begin() {
        let mut surface = mounted(30, 30);
        let mut brush = BrushSettings::new(12, BrushColor::Yellow);
        surface.begin_stroke((1.0, 1.0), &brush);
        brush.set_size(2);
        brush.set_color(BrushColor::Black);
        surface.extend_stroke((2.0, 2.0));
        surface.end_stroke();

        let stroke = &surface.strokes()[0];
        assert_eq!(stroke.width(), 12);
        assert_eq!(stroke.color(), BrushColor::Yellow);
        assert_eq!(stroke.points(), &[(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn single_point_stroke_paints_a_dot() {
        let mut surface = mounted(20, 20);
        surface.begin_stroke((10.0, 10.0), &BrushSettings::new(4, BrushColor::Black));
        surface.end_stroke();
        let mask = surface.rasterize().unwrap();
        assert_eq!(*mask.get_pixel(10, 10), BrushColor::Black.to_rgba());
        assert_eq!(*mask.get_pixel(15, 10), TRANSPARENT);
    }

    #[test]
    fn clear_discards_everything_at_once() {
        let mut surface = mounted(50, 50);
        let brush = BrushSettings::new(10, BrushColor::White);
        surface.begin_stroke((0.0, 0.0), &brush);
        surface.extend_stroke((49.0, 49.0));
        surface.end_stroke();
        surface.begin_stroke((49.0, 0.0), &brush);
        surface.extend_stroke((0.0, 49.0));
        assert!(surface.preview().is_some());

        let generation = surface.preview_generation();
        surface.clear();
        assert!(surface.preview().is_none());
        assert!(surface.is_empty());
        assert!(surface.preview_generation() > generation);
        assert!(is_transparent(&surface.rasterize().unwrap()));
    }

    #[test]
    fn preview_follows_every_mutation() {
        let mut surface = mounted(30, 30);
        let brush = BrushSettings::new(3, BrushColor::White);
        surface.begin_stroke((5.0, 5.0), &brush);
        surface.extend_stroke((25.0, 5.0));
        let after_extend = surface.preview().cloned().unwrap();
        assert_eq!(after_extend, surface.rasterize().unwrap());

        surface.extend_stroke((25.0, 25.0));
        surface.end_stroke();
        assert_eq!(surface.preview(), Some(&surface.rasterize().unwrap()));
        assert_ne!(surface.preview(), Some(&after_extend));
    }

    #[test]
    fn mask_matches_declared_size() {
        let surface = mounted(800, 500);
        let mask = surface.rasterize().unwrap();
        assert_eq!(mask.dimensions(), (800, 500));
        assert!(is_transparent(&mask));
    }

    #[test]
    fn out_of_bounds_points_are_clipped() {
        let mut surface = mounted(10, 10);
        let brush = BrushSettings::new(50, BrushColor::Blue);
        surface.begin_stroke((-100.0, -100.0), &brush);
        surface.extend_stroke((500.0, -40.0));
        surface.end_stroke();
        let mask = surface.rasterize().unwrap();
        assert_eq!(mask.dimensions(), (10, 10));
        assert!(is_transparent(&mask));
    }

    #[test]
    fn unmount_discards_strokes() {
        let mut surface = mounted(10, 10);
        surface.begin_stroke((1.0, 1.0), &BrushSettings::default());
        surface.end_stroke();
        surface.unmount();
        assert!(!surface.is_mounted());
        assert!(surface.is_empty());
        assert!(surface.preview().is_none());
    }
}
