//! Filesystem module.
//!
//! Provides:
//! - Folder normalization and filename generation
//! - Safe resolution of download paths

pub mod naming;
pub mod paths;

pub use naming::{
    build_filename, build_filename_from_hint, extract_filename, make_unique_filename,
    normalize_folder, sanitize_path_component,
};
pub use paths::{ensure_dir, resolve_download_path};
