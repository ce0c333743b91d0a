//! Media identification and rendition modelling.
//!
//! Provides:
//! - Canonical media ids shared by every data source
//! - MP4 rendition descriptors and their ranking score
//! - URL shape checks for media-host and API traffic

pub mod id;
pub mod kind;
pub mod shape;
pub mod variant;

pub use id::MediaId;
pub use kind::MediaType;
pub use shape::{is_intercepted_api_url, is_media_request, is_progressive_mp4, MEDIA_HOST};
pub use variant::{resolution_area, VariantDescriptor};
