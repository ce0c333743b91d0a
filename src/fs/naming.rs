//! Filename generation and manipulation.

use std::path::{Path, PathBuf};

use chrono::Utc;
use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};
use crate::media::MediaType;

/// Upper bound on `name (n).ext` candidates tried for a free filename.
const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

/// Normalize a user-supplied folder into a relative `/`-separated path.
///
/// Backslashes become slashes; empty, `.` and `..` segments are dropped.
pub fn normalize_folder(input: &str) -> String {
    input
        .trim()
        .replace('\\', "/")
        .split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Last path segment of a URL, percent-decoded.
///
/// Empty when there is no segment, or when the segment holds a malformed
/// escape or does not decode to UTF-8.
pub fn extract_filename(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return String::new();
    };

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(decode_segment)
        .unwrap_or_default()
}

fn decode_segment(segment: &str) -> String {
    // Every '%' must start a two-digit hex escape
    let malformed = segment.split('%').skip(1).any(|rest| {
        rest.len() < 2 || !rest.as_bytes()[..2].iter().all(u8::is_ascii_hexdigit)
    });
    if malformed {
        return String::new();
    }

    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}

/// Filename for a URL download, placed under `folder`.
pub fn build_filename(url: &str, folder: &str, media_type: Option<MediaType>) -> String {
    let base_name = Some(extract_filename(url))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| generated_name(media_type, None));

    join_folder(folder, &base_name)
}

/// Filename for a raw-bytes download, placed under `folder`.
///
/// Without a hint a name is generated, with an extension guessed from the
/// MIME type when one is known.
pub fn build_filename_from_hint(
    folder: &str,
    filename_hint: Option<&str>,
    media_type: Option<MediaType>,
    mime_type: &str,
) -> String {
    let base_name = filename_hint
        .filter(|hint| !hint.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| generated_name(media_type, Some(mime_type)));

    join_folder(folder, &base_name)
}

fn generated_name(media_type: Option<MediaType>, mime_type: Option<&str>) -> String {
    let label = media_type.map(|t| t.label()).unwrap_or("download");
    let stem = format!("{}-{}", label, Utc::now().timestamp_millis());

    let extension = mime_type
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|extensions| extensions.first());

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn join_folder(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Sanitize a single path component.
///
/// Traversal and null bytes are rejected; characters that are invalid on
/// common filesystems are replaced with `_`.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // Replace separators and characters Windows refuses
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Find a free path by inserting ` (n)` before the extension.
///
/// Fails once every candidate up to the attempt limit is taken.
pub fn make_unique_filename(path: &Path) -> Result<PathBuf> {
    unique_within(path, MAX_UNIQUE_ATTEMPTS)
}

fn unique_within(path: &Path, max_attempts: u32) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for counter in 1..=max_attempts {
        let new_name = if ext.is_empty() {
            format!("{} ({})", stem, counter)
        } else {
            format!("{} ({}).{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !new_path.exists() {
            return Ok(new_path);
        }
    }

    Err(Error::InvalidFilename(format!(
        "No free filename for '{}' after {} attempts",
        path.display(),
        max_attempts
    )))
}
