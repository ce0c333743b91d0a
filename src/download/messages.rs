//! Runtime messages sent by the page to request a download.

use serde::{Deserialize, Serialize};

use crate::config::OptionsConfig;
use crate::download::request::{DownloadId, DownloadOutcome, DownloadRequest, Downloader};
use crate::engine::EngineHandle;
use crate::error::{Error, Result};
use crate::media::MediaType;

/// A download request coming from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuntimeMessage {
    /// Save a media URL the page already knows.
    #[serde(rename_all = "camelCase")]
    DownloadMedia {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        media_type: Option<MediaType>,
    },

    /// Save bytes the page fetched itself.
    #[serde(rename_all = "camelCase")]
    DownloadMediaBlob {
        #[serde(default)]
        data: Option<Vec<u8>>,
        #[serde(default)]
        mime_type: Option<String>,
        #[serde(default)]
        filename_hint: Option<String>,
        #[serde(default)]
        media_type: Option<MediaType>,
    },

    /// Save the best known rendition of a Twitter/X video.
    #[serde(rename_all = "camelCase")]
    DownloadTwitterVideo {
        #[serde(default)]
        media_id: Option<String>,
    },
}

/// Reply sent back to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_id: Option<DownloadId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    fn success(id: DownloadId) -> Self {
        Self {
            ok: true,
            download_id: Some(id),
            error: None,
        }
    }

    fn failure(error: &Error) -> Self {
        Self {
            ok: false,
            download_id: None,
            error: Some(error.to_string()),
        }
    }
}

/// Turns runtime messages into downloads.
pub struct MessageDispatcher<D> {
    engine: EngineHandle,
    downloader: D,
    options: OptionsConfig,
}

impl<D: Downloader> MessageDispatcher<D> {
    pub fn new(engine: EngineHandle, downloader: D, options: OptionsConfig) -> Self {
        Self {
            engine,
            downloader,
            options,
        }
    }

    /// Handle one message. Failures are logged and reported, never raised.
    ///
    /// `sender_tab` is the tab the message came from, if any.
    pub async fn dispatch(&self, message: RuntimeMessage, sender_tab: Option<i64>) -> MessageResponse {
        match self.handle(message, sender_tab).await {
            Ok(outcome) => MessageResponse::success(outcome.id),
            Err(e) => MessageResponse::failure(&e),
        }
    }

    /// Handle one message and return the completed download.
    pub async fn handle(&self, message: RuntimeMessage, sender_tab: Option<i64>) -> Result<DownloadOutcome> {
        match message {
            RuntimeMessage::DownloadMedia { url, media_type } => self
                .download_media(url, media_type)
                .await
                .inspect_err(|e| tracing::warn!("Download failed: {}", e)),
            RuntimeMessage::DownloadMediaBlob {
                data,
                mime_type,
                filename_hint,
                media_type,
            } => self
                .download_blob(data, mime_type, filename_hint, media_type)
                .await
                .inspect_err(|e| tracing::warn!("Blob download failed: {}", e)),
            RuntimeMessage::DownloadTwitterVideo { media_id } => self
                .download_twitter_video(media_id, sender_tab)
                .await
                .inspect_err(|e| tracing::warn!("Twitter video download failed: {}", e)),
        }
    }

    async fn download_media(
        &self,
        url: Option<String>,
        media_type: Option<MediaType>,
    ) -> Result<DownloadOutcome> {
        let url = url.filter(|u| !u.is_empty()).ok_or(Error::MissingUrl)?;
        let request = DownloadRequest::for_url(&self.options, &url, media_type);
        self.downloader.download(request).await
    }

    async fn download_blob(
        &self,
        data: Option<Vec<u8>>,
        mime_type: Option<String>,
        filename_hint: Option<String>,
        media_type: Option<MediaType>,
    ) -> Result<DownloadOutcome> {
        let data = data.filter(|d| !d.is_empty()).ok_or(Error::MissingBlobData)?;
        let request = DownloadRequest::for_bytes(
            &self.options,
            data,
            mime_type.as_deref(),
            filename_hint.as_deref(),
            media_type,
        );
        self.downloader.download(request).await
    }

    async fn download_twitter_video(
        &self,
        media_id: Option<String>,
        sender_tab: Option<i64>,
    ) -> Result<DownloadOutcome> {
        let media_id = media_id.unwrap_or_default();
        let url = self
            .engine
            .resolve(sender_tab, &media_id)
            .await?
            .ok_or(Error::Unresolved)?;

        tracing::debug!("Resolved media '{}' to {}", media_id, url);
        self.download_media(Some(url), Some(MediaType::Video)).await
    }
}
