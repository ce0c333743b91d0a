//! Per-tab session state.
//!
//! Provides:
//! - Validated tab identifiers
//! - Keyed stores with a most-recent fallback slot
//! - The registry that ties session lifetime to the tab lifetime

pub mod registry;
pub mod store;

pub use registry::{SessionRegistry, TabId, TabSession};
pub use store::{MediaStore, RawRequestRecord};
