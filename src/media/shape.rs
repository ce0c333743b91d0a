//! URL shape checks for observed traffic.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Host that serves Twitter/X video files and playlists.
pub const MEDIA_HOST: &str = "video.twimg.com";

/// Hosts whose GraphQL responses embed video renditions.
const API_HOSTS: &[&str] = &["x.com", "twitter.com", "api.x.com", "api.twitter.com"];

/// Path prefix of the GraphQL API.
const API_PATH_PREFIX: &str = "/i/api/graphql/";

/// Path markers of init and segment requests that look like MP4 files.
const SEGMENT_MARKERS: &[&str] = &["/0/0/", "/0/3000/", "/3000/6000/"];

/// Single-file rendition path: `/vid/avc1/<w>x<h>/<name>.mp4`.
static PROGRESSIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/vid/avc1/\d+x\d+/[^/]+\.mp4").expect("progressive pattern is valid")
});

fn http_url(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

/// Whether a request to the media host should be recorded.
///
/// Only playlist (`.m3u8`) and MP4 (`.mp4`) traffic is of interest.
pub fn is_media_request(raw: &str) -> bool {
    let Some(parsed) = http_url(raw) else {
        return false;
    };

    parsed.host_str() == Some(MEDIA_HOST) && (raw.contains(".m3u8") || raw.contains(".mp4"))
}

/// Whether a response body should be tapped for embedded renditions.
pub fn is_intercepted_api_url(raw: &str) -> bool {
    let Some(parsed) = http_url(raw) else {
        return false;
    };

    let host_matches = parsed
        .host_str()
        .map(|host| API_HOSTS.contains(&host))
        .unwrap_or(false);

    host_matches && parsed.path().starts_with(API_PATH_PREFIX)
}

/// Whether a URL is a directly downloadable single-file MP4.
///
/// Manifest init files and fMP4 segments share the `.mp4` suffix but saving
/// them produces a broken file, so they are rejected here.
pub fn is_progressive_mp4(url: &str) -> bool {
    if !url.contains(MEDIA_HOST) || !url.contains(".mp4") {
        return false;
    }

    if SEGMENT_MARKERS.iter().any(|marker| url.contains(marker)) {
        return false;
    }

    if url.contains(".m4s") {
        return false;
    }

    PROGRESSIVE_PATTERN.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_request_filter() {
        assert!(is_media_request(
            "https://video.twimg.com/amplify_video/1/pl/abc.m3u8?variant_version=1"
        ));
        assert!(is_media_request(
            "https://video.twimg.com/amplify_video/1/vid/avc1/0/0/720x1280/init.mp4"
        ));
        assert!(!is_media_request("https://video.twimg.com/amplify_video/1/img/a.jpg"));
        assert!(!is_media_request("https://pbs.twimg.com/media/a.mp4"));
        assert!(!is_media_request("video.twimg.com/x.mp4"));
    }

    #[test]
    fn test_api_url_filter() {
        assert!(is_intercepted_api_url(
            "https://x.com/i/api/graphql/abc/TweetDetail?variables=%7B%7D"
        ));
        assert!(is_intercepted_api_url("http://api.twitter.com/i/api/graphql/q/UserMedia"));
        assert!(!is_intercepted_api_url("https://x.com/i/api/2/notifications"));
        assert!(!is_intercepted_api_url("https://evil.com/i/api/graphql/abc"));
        assert!(!is_intercepted_api_url("https://sub.x.com/i/api/graphql/abc"));
    }

    #[test]
    fn test_progressive_accepts_single_file() {
        assert!(is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/vid/avc1/1280x720/abc123.mp4"
        ));
        assert!(is_progressive_mp4(
            "https://video.twimg.com/ext_tw_video/1/pu/vid/avc1/640x360/abc.mp4?tag=12"
        ));
    }

    #[test]
    fn test_progressive_rejects_segment_shapes() {
        assert!(!is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/vid/avc1/0/0/1280x720/abc.mp4"
        ));
        assert!(!is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/vid/avc1/0/3000/1280x720/abc.mp4"
        ));
        assert!(!is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/vid/avc1/3000/6000/1280x720/abc.mp4"
        ));
        assert!(!is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/vid/avc1/1280x720/abc.m4s"
        ));
        assert!(!is_progressive_mp4(
            "https://video.twimg.com/amplify_video/1/pl/avc1/1280x720/abc.m3u8"
        ));
        assert!(!is_progressive_mp4(
            "https://cdn.example.com/vid/avc1/1280x720/abc.mp4"
        ));
    }
}
