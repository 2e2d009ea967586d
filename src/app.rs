use std::sync::{Arc, mpsc};

use chrono::Utc;
use eframe::egui;
use image::RgbaImage;

use crate::brush::BrushSettings;
use crate::components::controls::{ControlsAction, show_controls};
use crate::components::drawing::DrawingView;
use crate::components::notification::Notification;
use crate::components::preview::PreviewSection;
use crate::components::uploader::{UploaderAction, show_uploader};
use crate::components::{PAGE_BG, PANEL_BG};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::export::{DownloadDir, ExportReport, MaskExporter};
use crate::image_source::{Image, ImageSource};
use crate::remote::RemoteClient;
use crate::surface::StrokeSurface;
use crate::upload::{self, PickedFile};

// ============================================================================
// BACKGROUND JOBS: uploads and exports run on rayon and report back here
// ============================================================================

/// Result delivered from a background job.
pub enum TaskResult {
    /// The remote service accepted the image and the local copy decoded.
    ImageUploaded { image: Image, pixels: RgbaImage },
    /// Upload or decode failed.
    UploadFailed(String),
    /// An export finished (or could not encode its mask).
    ExportFinished(Result<ExportReport>),
}

pub struct MaskCanvasApp {
    client: Arc<RemoteClient>,
    downloads: Arc<DownloadDir>,

    // Session state
    source: ImageSource,
    surface: StrokeSurface,
    brush: BrushSettings,
    exporter: MaskExporter,

    // Views
    drawing: DrawingView,
    preview: PreviewSection,
    notification: Notification,

    task_sender: mpsc::Sender<TaskResult>,
    task_receiver: mpsc::Receiver<TaskResult>,
    pending_uploads: usize,
}

impl MaskCanvasApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, client: RemoteClient) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::with_client(config, client)
    }

    /// Session state without a window attached.
    pub fn with_client(config: AppConfig, client: RemoteClient) -> Self {
        let downloads = DownloadDir::new(config.download_dir);
        log_info!(
            "Remote service: {}  downloads: {}",
            client.base_url(),
            downloads.path().display()
        );

        let (task_sender, task_receiver) = mpsc::channel();

        Self {
            client: Arc::new(client),
            downloads: Arc::new(downloads),
            source: ImageSource::new(),
            surface: StrokeSurface::new(),
            brush: BrushSettings::default(),
            exporter: MaskExporter::new(),
            drawing: DrawingView::default(),
            preview: PreviewSection::default(),
            notification: Notification::default(),
            task_sender,
            task_receiver,
            pending_uploads: 0,
        }
    }

    fn is_uploading(&self) -> bool {
        self.pending_uploads > 0
    }

    // -- Upload ------------------------------------------------------------

    fn handle_pick_file(&mut self, ctx: &egui::Context) {
        let Some(path) = upload::pick_image_path() else {
            return;
        };
        let picked = PickedFile::from_path(&path);
        self.handle_candidate(ctx, picked);
    }

    fn handle_candidate(&mut self, ctx: &egui::Context, picked: Result<PickedFile>) {
        match picked {
            Ok(file) => self.start_upload(ctx, file),
            Err(Error::InvalidFileType) => {
                log_warn!("Rejected upload: not a JPEG or PNG file");
                self.notification.notify(Error::InvalidFileType.to_string());
            }
            Err(e) => {
                log_err!("Could not read selected file: {}", e);
                self.notification.notify(format!("Could not read the selected file: {}", e));
            }
        }
    }

    fn start_upload(&mut self, ctx: &egui::Context, file: PickedFile) {
        log_info!("Uploading {} ({}, {} bytes)", file.name, file.mime.as_str(), file.bytes.len());
        self.pending_uploads += 1;

        let client = Arc::clone(&self.client);
        let sender = self.task_sender.clone();
        let ctx = ctx.clone();
        rayon::spawn(move || {
            let result = client
                .upload_image(&file)
                .and_then(|image| Ok(TaskResult::ImageUploaded { image, pixels: file.decode()? }));
            let message = match result {
                Ok(done) => done,
                Err(e) => {
                    log_err!("Error uploading image {}: {}", file.name, e);
                    TaskResult::UploadFailed(e.to_string())
                }
            };
            let _ = sender.send(message);
            ctx.request_repaint();
        });
    }

    // -- Export ------------------------------------------------------------

    fn handle_export(&mut self, ctx: &egui::Context) {
        let Some(image) = self.source.image() else {
            return;
        };
        let job = match self.exporter.begin(&self.surface, image, Utc::now()) {
            Ok(job) => job,
            Err(e) => {
                log_warn!("Export refused: {}", e);
                self.notification.notify(format!("Failed to export mask: {}", e));
                return;
            }
        };
        log_info!(
            "Exporting {} for image {}{}",
            job.filename(),
            image.id,
            if self.surface.is_empty() { " (no strokes)" } else { "" }
        );

        let client = Arc::clone(&self.client);
        let downloads = Arc::clone(&self.downloads);
        let sender = self.task_sender.clone();
        let ctx = ctx.clone();
        rayon::spawn(move || {
            let report = job.run(client.as_ref(), downloads.as_ref());
            let _ = sender.send(TaskResult::ExportFinished(report));
            ctx.request_repaint();
        });
    }

    // -- Results -------------------------------------------------------------

    fn poll_tasks(&mut self) {
        while let Ok(result) = self.task_receiver.try_recv() {
            match result {
                TaskResult::ImageUploaded { image, pixels } => {
                    self.pending_uploads = self.pending_uploads.saturating_sub(1);
                    log_info!("Image uploaded: id={} url={}", image.id, image.url);
                    self.surface.unmount();
                    self.source.set(image, pixels);
                }
                TaskResult::UploadFailed(error) => {
                    self.pending_uploads = self.pending_uploads.saturating_sub(1);
                    self.notification.notify(format!("Failed to upload image\n{}", error));
                }
                TaskResult::ExportFinished(Ok(report)) => {
                    self.notification.notify(report.summary());
                }
                TaskResult::ExportFinished(Err(e)) => {
                    log_err!("Export failed: {}", e);
                    self.notification.notify(format!("Failed to export mask: {}", e));
                }
            }
        }
    }

    fn change_image(&mut self) {
        log_info!("Change image requested");
        self.source.clear();
        self.surface.unmount();
    }

    // -- Views ---------------------------------------------------------------

    fn show_upload_view(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Drag and Drop an image here or select a file")
                    .color(egui::Color32::from_rgb(0x60, 0xa5, 0xfa)),
            );
        });
        ui.add_space(12.0);

        let uploading = self.is_uploading();
        let action = centered(ui, 800.0 + 24.0 + 300.0, |ui| show_uploader(ui, uploading));
        if action == Some(UploaderAction::PickFile) {
            self.handle_pick_file(ui.ctx());
        }
    }

    fn show_drawing_view(&mut self, ui: &mut egui::Ui) {
        let in_flight = self.exporter.is_in_flight();
        let action = centered(ui, 800.0 + 24.0 + 300.0, |ui| {
            self.drawing.show(ui, &self.source, &mut self.surface, &self.brush);
            ui.add_space(24.0);
            show_controls(ui, &mut self.brush, in_flight)
        });

        match action {
            Some(ControlsAction::Clear) => self.surface.clear(),
            Some(ControlsAction::Export) => self.handle_export(ui.ctx()),
            Some(ControlsAction::ChangeImage) => {
                self.change_image();
                return;
            }
            None => {}
        }

        ui.add_space(32.0);
        let (line, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 2.0), egui::Sense::hover());
        ui.painter().rect_filled(line, 0.0, PANEL_BG);
        ui.add_space(32.0);
        self.preview.show(ui, &self.source, &self.surface);
    }
}

/// Lay `add_contents` out horizontally, centered for a row of `width` points.
fn centered<R>(ui: &mut egui::Ui, width: f32, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    ui.horizontal(|ui| {
        ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
        add_contents(ui)
    })
    .inner
}

impl eframe::App for MaskCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_tasks();

        // --- Drag-and-Drop onto the uploader ---
        let dropped: Vec<egui::DroppedFile> = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.first()
            && !self.source.has_image()
            && !self.is_uploading()
            && !self.notification.is_open()
        {
            self.handle_candidate(ctx, upload::from_dropped(file));
        }

        let modal_open = self.notification.is_open();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(PAGE_BG).inner_margin(24.0))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Mask Drawing App").size(36.0).strong().color(egui::Color32::WHITE));
                ui.add_space(32.0);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_enabled_ui(!modal_open, |ui| {
                        if self.source.has_image() {
                            self.show_drawing_view(ui);
                        } else {
                            self.show_upload_view(ui);
                        }
                    });
                });
            });

        self.notification.show(ctx);

        if self.is_uploading() || self.exporter.is_in_flight() {
            ctx.request_repaint();
        }
    }
}
