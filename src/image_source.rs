use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// An image registered with the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
}

/// What `GET /images/{id}` reports about a previously uploaded image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub mask_url: Option<String>,
}

/// The active image of the session together with its decoded pixels.
pub struct ImageSource {
    active: Option<(Image, RgbaImage)>,
    /// Bumped whenever the active image changes so views can drop textures.
    generation: u64,
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource {
    pub fn new() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }

    pub fn set(&mut self, image: Image, pixels: RgbaImage) {
        self.active = Some((image, pixels));
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.generation += 1;
    }

    pub fn image(&self) -> Option<&Image> {
        self.active.as_ref().map(|(image, _)| image)
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.active.as_ref().map(|(_, pixels)| pixels)
    }

    pub fn has_image(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
