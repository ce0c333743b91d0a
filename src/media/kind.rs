//! Media type tags attached to download requests.

use serde::{Deserialize, Serialize};

/// Type of media content being saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    /// Label used when a filename has to be generated.
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Unknown => "download",
        }
    }

    /// Whether files of this type go to the video folder.
    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::Video)
    }
}
