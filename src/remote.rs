//! Blocking HTTP client for the mask service.
//!
//! Every call runs on a background worker (see `app.rs`), never on the UI
//! thread.  Non-success statuses are errors; nothing is retried.

use reqwest::blocking::{Client, Response, multipart};
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::image_source::{Image, ImageRecord};
use crate::upload::PickedFile;

/// Longest slice of an error body kept in [`Error::Status`].
const ERROR_BODY_LIMIT: usize = 200;

pub struct RemoteClient {
    client: Client,
    config: RemoteConfig,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// `POST {base}/upload` with the file in multipart field `file`.
    pub fn upload_image(&self, file: &PickedFile) -> Result<Image> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime.as_str())?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.endpoint(&["upload"])?)
            .multipart(form)
            .send()?;
        read_json(response)
    }

    /// `POST {base}/upload/{image_id}/mask` with the PNG in multipart field `file`.
    pub fn upload_mask(&self, image_id: &str, png: Vec<u8>, filename: &str) -> Result<serde_json::Value> {
        let part = multipart::Part::bytes(png)
            .file_name(filename.to_string())
            .mime_str("image/png")?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.endpoint(&["upload", image_id, "mask"])?)
            .multipart(form)
            .send()?;
        read_json(response)
    }

    /// `GET {base}/images/{image_id}`.
    pub fn get_image(&self, image_id: &str) -> Result<ImageRecord> {
        let response = self.client.get(self.endpoint(&["images", image_id])?).send()?;
        read_json(response)
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|e| Error::Config(format!("base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL '{}' cannot carry a path", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::Status {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }
    let bytes = response.bytes()?;
    serde_json::from_slice(&bytes).map_err(|e| Error::InvalidResponse(e.to_string()))
}
