//! MP4 rendition descriptors.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use regex::Regex;

/// Content type of renditions that can be saved as a single file.
pub const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Weight of the bitrate in the score. Any declared bitrate outranks every
/// plausible resolution area.
const BITRATE_WEIGHT: f64 = 1_000_000.0;

static RESOLUTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)x(\d+)/").expect("resolution pattern is valid"));

/// One MP4 rendition candidate.
///
/// The bitrate is kept as declared, fractions included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub url: String,
    pub bitrate: f64,
}

impl VariantDescriptor {
    pub fn new(url: impl Into<String>, bitrate: f64) -> Self {
        Self {
            url: url.into(),
            bitrate,
        }
    }

    /// Build a descriptor from one entry of a `video_info.variants` list.
    ///
    /// Returns `None` for entries that are not MP4 or carry no URL.
    pub fn from_json(entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;

        if object.get("content_type").and_then(Value::as_str) != Some(MP4_CONTENT_TYPE) {
            return None;
        }

        let url = object.get("url").and_then(Value::as_str)?;
        if url.is_empty() {
            return None;
        }

        let bitrate = object.get("bitrate").map(bitrate_from_json).unwrap_or(0.0);

        Some(Self::new(url, bitrate))
    }

    /// Ranking score: bitrate first, resolution area as tie-break.
    pub fn score(&self) -> f64 {
        self.bitrate * BITRATE_WEIGHT + resolution_area(&self.url) as f64
    }
}

/// Numeric value of a declared bitrate.
///
/// Numbers and numeric strings are taken as is; booleans count as 1 or 0.
/// Anything else, or a value that is not finite, reads as 0.
fn bitrate_from_json(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Pixel area from a `/<width>x<height>/` path segment, or 0.
pub fn resolution_area(url: &str) -> u64 {
    let Some(captures) = RESOLUTION_PATTERN.captures(url) else {
        return 0;
    };

    let width: u64 = captures[1].parse().unwrap_or(0);
    let height: u64 = captures[2].parse().unwrap_or(0);

    width.saturating_mul(height)
}
