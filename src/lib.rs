//! MaskCanvas: upload an image, paint a mask over it, preview the mask and
//! submit it to a remote mask service.

#[macro_use]
pub mod logger;

pub mod app;
pub mod brush;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod image_source;
pub mod remote;
pub mod surface;
pub mod upload;

pub use error::{Error, Result};
