//! Ingestion of observed network traffic.
//!
//! Provides:
//! - Raw media request tracking
//! - Response stream buffering and the passive stream tap
//! - Rendition extraction from API payloads
//! - Best-rendition retention per media id

pub mod extractor;
pub mod interceptor;
pub mod requests;
pub mod scorer;

pub use extractor::extract_variants;
pub use interceptor::{tap_response, ResponseBuffers, TappedStream};
pub use requests::record_request;
pub use scorer::register_variant;
