//! Saving downloads to the local filesystem over HTTP.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::download::request::{DownloadId, DownloadOutcome, DownloadRequest, DownloadSource, Downloader};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, make_unique_filename, resolve_download_path};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Downloader that writes under the configured download directory.
///
/// Existing files are never overwritten; a ` (n)` suffix is added instead.
pub struct HttpDownloader {
    client: Client,
    base_dir: PathBuf,
    show_progress: bool,
    next_id: AtomicU64,
}

impl HttpDownloader {
    /// Create a downloader from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.network.user_agent)
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_dir: config.options.download_directory(),
            show_progress: config.options.show_downloads,
            next_id: AtomicU64::new(1),
        })
    }

    /// Stream a URL to a file.
    async fn fetch_to_file(&self, url: &str, output_path: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        // Create progress bar if needed
        let content_length = response.content_length();
        let progress = (self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false))
        .then(|| create_download_bar(content_length.unwrap_or(0)));

        // Stream to file
        let mut file = File::create(output_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(())
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, request: DownloadRequest) -> Result<DownloadOutcome> {
        // Determine output path
        let target = resolve_download_path(&self.base_dir, &request.filename)?;

        // Ensure target directory exists
        if let Some(parent) = target.parent() {
            ensure_dir(parent).await?;
        }

        // Never overwrite an existing file
        let path = make_unique_filename(&target)?;

        match &request.source {
            DownloadSource::Url(url) => {
                if let Err(e) = self.fetch_to_file(url, &path).await {
                    // Leave no partial file behind.
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(e);
                }
            }
            DownloadSource::Bytes { data, .. } => tokio::fs::write(&path, data).await?,
        }

        let id = DownloadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::info!("Downloaded: {}", path.display());

        Ok(DownloadOutcome { id, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionsConfig;

    fn downloader(dir: &Path) -> HttpDownloader {
        let config = Config {
            options: OptionsConfig {
                download_directory: Some(dir.to_path_buf()),
                show_downloads: false,
                ..Default::default()
            },
            ..Default::default()
        };
        HttpDownloader::new(&config).unwrap()
    }

    fn bytes_request(filename: &str, data: &[u8]) -> DownloadRequest {
        DownloadRequest {
            source: DownloadSource::Bytes {
                data: data.to_vec(),
                mime_type: "image/png".to_string(),
            },
            filename: filename.to_string(),
            media_type: None,
        }
    }

    #[tokio::test]
    async fn test_writes_bytes_under_folder() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = downloader(dir.path());

        let outcome = downloader
            .download(bytes_request("images/a.png", b"png"))
            .await
            .unwrap();

        assert_eq!(outcome.id, DownloadId(1));
        assert_eq!(outcome.path, dir.path().join("images").join("a.png"));
        assert_eq!(std::fs::read(&outcome.path).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_existing_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = downloader(dir.path());

        let first = downloader.download(bytes_request("a.png", b"1")).await.unwrap();
        let second = downloader.download(bytes_request("a.png", b"2")).await.unwrap();

        assert_eq!(second.id, DownloadId(2));
        assert_eq!(second.path, dir.path().join("a (1).png"));
        assert_eq!(std::fs::read(&first.path).unwrap(), b"1");
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = downloader(dir.path());

        let result = downloader.download(bytes_request("../escape.png", b"x")).await;
        assert!(matches!(result, Err(Error::InvalidFilename(_))));
    }
}
