//! File selection for the uploader: native picker, drag-and-drop and content
//! sniffing.  Only JPEG and PNG files make it to the remote client.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use rfd::FileDialog;

use crate::error::{Error, Result};

/// MIME types the uploader accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    /// Sniff the MIME type from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Jpeg => Some(ImageMime::Jpeg),
            ImageFormat::Png => Some(ImageMime::Png),
            _ => None,
        }
    }
}

/// A validated image file ready to upload.
#[derive(Clone, Debug)]
pub struct PickedFile {
    pub name: String,
    pub mime: ImageMime,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Validate raw file contents.  Anything that is not JPEG or PNG is
    /// rejected with [`Error::InvalidFileType`].
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let mime = ImageMime::sniff(&bytes).ok_or(Error::InvalidFileType)?;
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Self::from_bytes(name, bytes)
    }

    /// Decode the file for on-screen display.
    pub fn decode(&self) -> Result<RgbaImage> {
        let format = match self.mime {
            ImageMime::Jpeg => ImageFormat::Jpeg,
            ImageMime::Png => ImageFormat::Png,
        };
        Ok(image::load_from_memory_with_format(&self.bytes, format)?.to_rgba8())
    }
}

/// Show the native open dialog filtered to JPEG / PNG files.
pub fn pick_image_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Turn a file dropped onto the window into an upload candidate.
pub fn from_dropped(file: &egui::DroppedFile) -> Result<PickedFile> {
    if let Some(bytes) = &file.bytes {
        let name = if file.name.is_empty() { "upload" } else { file.name.as_str() };
        return PickedFile::from_bytes(name, bytes.to_vec());
    }
    match &file.path {
        Some(path) => PickedFile::from_path(path),
        None => Err(Error::InvalidFileType),
    }
}
