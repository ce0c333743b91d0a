//! Canonical media identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Path prefixes on the media host that carry a numeric media id.
static MEDIA_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:amplify_video|ext_tw_video|tweet_video)/(\d+)/")
        .expect("media path pattern is valid")
});

/// Canonical key for one media item.
///
/// Composite identifiers such as the `media_key` value `"13_1234"` reduce to
/// their trailing component so that API payloads and raw media URLs referring
/// to the same video land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(String);

impl MediaId {
    /// Normalize a raw string id. Returns `None` when nothing usable remains.
    pub fn normalize(raw: &str) -> Option<Self> {
        let tail = match raw.rfind('_') {
            Some(pos) => &raw[pos + 1..],
            None => raw,
        };

        if tail.is_empty() {
            None
        } else {
            Some(Self(tail.to_string()))
        }
    }

    /// Normalize a JSON id field (string or number).
    ///
    /// Empty strings and zero count as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::normalize(s),
            Value::Number(n) => {
                if n.as_u64() == Some(0) || n.as_f64() == Some(0.0) {
                    None
                } else {
                    Some(Self(n.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Extract the media id from a media-host URL path.
    pub fn from_media_url(raw_url: &str) -> Option<Self> {
        let parsed = url::Url::parse(raw_url).ok()?;
        let captures = MEDIA_PATH_PATTERN.captures(parsed.path())?;
        captures.get(1).map(|m| Self(m.as_str().to_string()))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
