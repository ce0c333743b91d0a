//! Download requests and the downloader seam.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OptionsConfig;
use crate::error::Result;
use crate::fs::{build_filename, build_filename_from_hint};
use crate::media::MediaType;

/// MIME type assumed for raw bytes without one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// What to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    /// Fetch a URL.
    Url(String),
    /// Write bytes the page already fetched.
    Bytes { data: Vec<u8>, mime_type: String },
}

/// A fully planned download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: DownloadSource,
    /// Destination relative to the download directory, `/`-separated.
    pub filename: String,
    pub media_type: Option<MediaType>,
}

impl DownloadRequest {
    /// Plan a URL download into the folder configured for its media type.
    pub fn for_url(options: &OptionsConfig, url: &str, media_type: Option<MediaType>) -> Self {
        let folder = options.folder_for(media_type.unwrap_or(MediaType::Unknown));

        Self {
            source: DownloadSource::Url(url.to_string()),
            filename: build_filename(url, &folder, media_type),
            media_type,
        }
    }

    /// Plan a raw-bytes download into the folder configured for its media type.
    pub fn for_bytes(
        options: &OptionsConfig,
        data: Vec<u8>,
        mime_type: Option<&str>,
        filename_hint: Option<&str>,
        media_type: Option<MediaType>,
    ) -> Self {
        let folder = options.folder_for(media_type.unwrap_or(MediaType::Unknown));
        let mime_type = mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        Self {
            filename: build_filename_from_hint(&folder, filename_hint, media_type, &mime_type),
            source: DownloadSource::Bytes { data, mime_type },
            media_type,
        }
    }
}

/// Identifier handed back for a started download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub id: DownloadId,
    pub path: PathBuf,
}

/// Saves planned downloads. The resolution engine never touches files itself.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, request: DownloadRequest) -> Result<DownloadOutcome>;
}
