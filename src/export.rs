// ============================================================================
// MASK EXPORT: rasterize once, save locally, upload independently
// ============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};

use crate::error::{Error, Result};
use crate::image_source::Image;
use crate::remote::RemoteClient;
use crate::surface::StrokeSurface;

/// Receives the encoded mask for the remote service.
pub trait MaskUploader: Send + Sync {
    fn upload_mask(&self, image_id: &str, png: Vec<u8>, filename: &str) -> Result<serde_json::Value>;
}

impl MaskUploader for RemoteClient {
    fn upload_mask(&self, image_id: &str, png: Vec<u8>, filename: &str) -> Result<serde_json::Value> {
        RemoteClient::upload_mask(self, image_id, png, filename)
    }
}

/// Host-side "save this buffer under this name" effect.
pub trait MaskDownloads: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves exported masks into a fixed directory.
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

impl MaskDownloads for DownloadDir {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// `mask_YYYY-MM-DD_HH-MM-SS.png`, in UTC.
pub fn mask_filename(now: DateTime<Utc>) -> String {
    format!("mask_{}.png", now.format("%Y-%m-%d_%H-%M-%S"))
}

pub fn encode_png(mask: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        mask.as_raw(),
        mask.width(),
        mask.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Hands out export jobs, at most one at a time.
#[derive(Clone, Default)]
pub struct MaskExporter {
    in_flight: Arc<AtomicBool>,
}

impl MaskExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Rasterize the surface and reserve the export slot.  Fails without side
    /// effects when the surface is not ready or another export is running.
    pub fn begin(&self, surface: &StrokeSurface, image: &Image, now: DateTime<Utc>) -> Result<ExportJob> {
        let mask = surface.rasterize()?;
        let guard = InFlightGuard::acquire(&self.in_flight)?;
        Ok(ExportJob {
            image_id: image.id.clone(),
            filename: mask_filename(now),
            mask,
            _guard: guard,
        })
    }
}

/// Releases the export slot when dropped.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::ExportInFlight)?;
        Ok(Self { flag: Arc::clone(flag) })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A rasterized mask waiting to be encoded, saved and uploaded.
pub struct ExportJob {
    image_id: String,
    filename: String,
    mask: RgbaImage,
    _guard: InFlightGuard,
}

impl ExportJob {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mask(&self) -> &RgbaImage {
        &self.mask
    }

    /// Encode the mask, save it locally, then upload it.  The save and the
    /// upload do not depend on each other; only an encoding failure stops
    /// both.  The export slot is released when this returns.
    pub fn run(self, uploader: &dyn MaskUploader, downloads: &dyn MaskDownloads) -> Result<ExportReport> {
        let png = encode_png(&self.mask)?;

        let download = downloads.save(&self.filename, &png);
        match &download {
            Ok(path) => {
                log_info!("Mask saved to {}", path.display());
            }
            Err(e) => {
                log_err!("Saving {} failed: {}", self.filename, e);
            }
        }

        let remote = uploader.upload_mask(&self.image_id, png, &self.filename);
        match &remote {
            Ok(ack) => {
                log_info!("Mask uploaded for image {}: {}", self.image_id, ack);
            }
            Err(e) => {
                log_err!("Mask upload for image {} failed: {}", self.image_id, e);
            }
        }

        Ok(ExportReport {
            filename: self.filename,
            download,
            remote,
        })
    }
}

/// Independent outcomes of one export.
#[derive(Debug)]
pub struct ExportReport {
    pub filename: String,
    pub download: Result<PathBuf>,
    pub remote: Result<serde_json::Value>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.download.is_ok() && self.remote.is_ok()
    }

    /// Message shown to the user once the export has finished.
    pub fn summary(&self) -> String {
        match (&self.download, &self.remote) {
            (Ok(_), Ok(_)) => "Mask exported and downloaded successfully!".to_string(),
            (Ok(path), Err(e)) => format!(
                "Mask saved to {}, but uploading it failed: {}",
                path.display(),
                e
            ),
            (Err(e), Ok(_)) => format!("Mask uploaded, but saving {} failed: {}", self.filename, e),
            (Err(save), Err(upload)) => format!(
                "Failed to export mask.\nSave: {}\nUpload: {}",
                save, upload
            ),
        }
    }
}
