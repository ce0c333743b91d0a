//! xdl-resolver - Twitter/X media resolution for a browser download helper
//!
//! The engine watches the network traffic of browser tabs and works out which
//! MP4 renditions exist for each video, so that a download request can be
//! answered with the best directly downloadable URL.
//!
//! # Features
//!
//! - Per-tab sessions that live exactly as long as the tab
//! - Raw media request tracking on the video host
//! - Passive tapping of GraphQL API responses
//! - Rendition ranking by bitrate, then resolution
//! - Rejection of playlist and fragment URLs
//! - Page-initiated downloads into configurable folders
//!
//! # Example
//!
//! ```no_run
//! use xdl_resolver::{Engine, EngineEvent, EngineHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (engine, _task) = EngineHandle::spawn(Engine::new());
//!
//!     engine.send(EngineEvent::RequestObserved {
//!         tab_id: 5,
//!         url: "https://video.twimg.com/amplify_video/999/vid/avc1/640x360/x.mp4".into(),
//!     })?;
//!
//!     if let Some(url) = engine.resolve(Some(5), "999").await? {
//!         println!("{}", url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod cli;
pub mod config;
pub mod download;
pub mod engine;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod session;

// Re-exports for convenience
pub use capture::{tap_response, TappedStream};
pub use config::Config;
pub use download::{Downloader, HttpDownloader, MessageDispatcher, MessageResponse, RuntimeMessage};
pub use engine::{Engine, EngineEvent, EngineHandle};
pub use error::{Error, Result};
pub use media::{MediaId, MediaType, VariantDescriptor};
pub use session::{SessionRegistry, TabId};
