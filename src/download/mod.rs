//! Download module.
//!
//! This module provides:
//! - Download requests and the `Downloader` collaborator seam
//! - Runtime message handling for page-initiated downloads
//! - An HTTP downloader that saves to the local filesystem

pub mod http;
pub mod messages;
pub mod request;

pub use http::HttpDownloader;
pub use messages::{MessageDispatcher, MessageResponse, RuntimeMessage};
pub use request::{DownloadId, DownloadOutcome, DownloadRequest, DownloadSource, Downloader};
