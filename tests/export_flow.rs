//! End-to-end flows: upload, draw, export against a mock mask service

mod common;

use std::time::Duration;

use chrono::Utc;
use image::Rgba;
use maskcanvas::Error;
use maskcanvas::brush::{BrushColor, BrushSettings};
use maskcanvas::export::{DownloadDir, MaskExporter};
use maskcanvas::image_source::{Image, ImageSource};
use maskcanvas::surface::StrokeSurface;
use maskcanvas::upload::PickedFile;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn upload_then_draw_white_stroke() {
    let (base, _requests) = common::serve(vec![(200, r#"{"id":"img-1","url":"https://bucket/img-1.png"}"#)]);
    let file = PickedFile::from_bytes("red.png", common::red_png()).unwrap();

    let image = common::client(&base).upload_image(&file).unwrap();
    let mut source = ImageSource::new();
    source.set(image, file.decode().unwrap());
    assert_eq!(
        source.image(),
        Some(&Image { id: "img-1".into(), url: "https://bucket/img-1.png".into() })
    );
    assert_eq!(source.pixels().unwrap().get_pixel(5, 5), &Rgba([255, 0, 0, 255]));

    let mut surface = StrokeSurface::new();
    surface.mount(800, 500);
    surface.begin_stroke((10.0, 10.0), &BrushSettings::new(5, BrushColor::White));
    surface.extend_stroke((50.0, 10.0));
    surface.end_stroke();

    let mask = surface.rasterize().unwrap();
    let white = Rgba([255, 255, 255, 255]);
    for x in 10..=50 {
        assert_eq!(mask.get_pixel(x, 10), &white);
    }
    assert_eq!(mask.get_pixel(30, 40)[3], 0);
    assert_eq!(mask.get_pixel(700, 400)[3], 0);
}

#[test]
fn text_file_never_reaches_the_service() {
    let (_base, requests) = common::serve(vec![(200, r#"{"id":"x","url":"y"}"#)]);

    let result = PickedFile::from_bytes("notes.txt", b"shopping list".to_vec());
    assert!(matches!(result, Err(Error::InvalidFileType)));
    assert_eq!(result.unwrap_err().to_string(), "Please upload a valid JPEG or PNG file.");
    assert!(requests.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn export_with_no_strokes_saves_and_uploads_empty_mask() {
    let (base, requests) = common::serve(vec![(200, r#"{"id":"img-7","mask_url":"https://bucket/m.png"}"#)]);
    let client = common::client(&base);
    let dir = common::scratch_dir("empty-export");
    let downloads = DownloadDir::new(&dir);

    let mut surface = StrokeSurface::new();
    surface.mount(800, 500);
    let image = Image { id: "img-7".into(), url: "https://bucket/img-7.png".into() };

    let report = MaskExporter::new()
        .begin(&surface, &image, Utc::now())
        .unwrap()
        .run(&client, &downloads)
        .unwrap();
    assert!(report.is_success(), "{}", report.summary());
    assert!(report.filename.starts_with("mask_") && report.filename.ends_with(".png"));

    let saved = report.download.as_ref().unwrap();
    let saved_mask = image::open(saved).unwrap().to_rgba8();
    assert_eq!(saved_mask.dimensions(), (800, 500));
    assert!(saved_mask.pixels().all(|p| p[3] == 0));

    let req = requests.recv().unwrap();
    assert_eq!(req.url, "/api/upload/img-7/mask");
    assert!(contains(&req.body, PNG_SIGNATURE));
    assert!(contains(&req.body, report.filename.as_bytes()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn remote_failure_leaves_local_mask_in_place() {
    let (base, _requests) = common::serve(vec![(500, r#"{"detail":"Image not found"}"#)]);
    let client = common::client(&base);
    let dir = common::scratch_dir("failed-export");
    let downloads = DownloadDir::new(&dir);

    let mut surface = StrokeSurface::new();
    surface.mount(800, 500);
    surface.begin_stroke((100.0, 100.0), &BrushSettings::new(20, BrushColor::Black));
    surface.extend_stroke((300.0, 200.0));
    surface.end_stroke();
    let image = Image { id: "gone".into(), url: "https://bucket/gone.png".into() };

    let exporter = MaskExporter::new();
    let report = exporter
        .begin(&surface, &image, Utc::now())
        .unwrap()
        .run(&client, &downloads)
        .unwrap();

    assert!(matches!(report.remote, Err(Error::Status { status: 500, .. })));
    let saved = report.download.as_ref().unwrap();
    assert!(saved.exists());
    let saved_mask = image::open(saved).unwrap().to_rgba8();
    assert_eq!(saved_mask.get_pixel(200, 150), &Rgba([0, 0, 0, 255]));
    assert!(!exporter.is_in_flight());

    let _ = std::fs::remove_dir_all(&dir);
}
