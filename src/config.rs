// ============================================================================
// Startup configuration: command line flags with environment fallbacks
// ============================================================================
//
// Usage examples:
//   maskcanvas --base-url https://masks.example.com/api
//   MASKCANVAS_BASE_URL=http://127.0.0.1:8000/api maskcanvas --timeout-secs 30

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::error::{Error, Result};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// MaskCanvas: draw a mask over an uploaded image and submit it.
#[derive(Parser, Debug, Clone)]
#[command(name = "maskcanvas", about = "Draw masks over images and submit them to a mask service")]
pub struct CliArgs {
    /// Base URL of the mask service (e.g. https://host/api).
    #[arg(long, env = "MASKCANVAS_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Directory exported masks are saved to. Defaults to the user's Downloads folder.
    #[arg(long, env = "MASKCANVAS_DOWNLOAD_DIR", value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Request timeout in seconds. Requests never time out when omitted.
    #[arg(long, env = "MASKCANVAS_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Directory for the session log. Defaults to the platform data directory.
    #[arg(long, env = "MASKCANVAS_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Where `maskcanvas.log` goes.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(crate::logger::default_log_dir)
    }
}

/// Settings for the remote client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Validate and normalise a base URL.  Only `http` and `https` are accepted.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| Error::Config(format!("base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base URL '{}' must use http or https",
                base_url
            )));
        }
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub download_dir: PathBuf,
}

impl AppConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let remote = RemoteConfig::new(&args.base_url)?
            .with_timeout(args.timeout_secs.map(Duration::from_secs));
        let download_dir = args.download_dir.unwrap_or_else(default_download_dir);
        Ok(Self {
            remote,
            download_dir,
        })
    }
}

/// The user's Downloads folder, or the working directory if it cannot be found.
pub fn default_download_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_DOWNLOAD_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return PathBuf::from(profile).join("Downloads");
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        let downloads = PathBuf::from(home).join("Downloads");
        if downloads.is_dir() {
            return downloads;
        }
    }
    PathBuf::from(".")
}
