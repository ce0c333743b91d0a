//! Resolution of a downloadable video URL.

use crate::media::{is_progressive_mp4, MediaId};
use crate::session::{SessionRegistry, TabId};

/// Pick the best directly downloadable URL known for a media item.
///
/// Renditions from API payloads win over raw requests; the id-specific entry
/// wins over the tab-wide fallback. A raw request is only returned when it
/// is a progressive MP4, never a playlist or fragment.
pub fn resolve(registry: &SessionRegistry, tab: TabId, media_id: Option<&MediaId>) -> Option<String> {
    let session = registry.get(tab)?;

    let variant = media_id
        .and_then(|id| session.variants.get(id))
        .or_else(|| session.variants.last_seen());
    if let Some(variant) = variant {
        return Some(variant.url.clone());
    }

    let record = media_id
        .and_then(|id| session.requests.get(id))
        .or_else(|| session.requests.last_seen())?;

    if record.url.contains(".mp4") && is_progressive_mp4(&record.url) {
        return Some(record.url.clone());
    }

    tracing::debug!(
        "Tab {}: last media request is not a progressive MP4: {}",
        tab,
        record.url
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{record_request, register_variant};
    use crate::media::VariantDescriptor;

    const TAB: TabId = TabId::new(11);

    fn id(raw: &str) -> MediaId {
        MediaId::normalize(raw).unwrap()
    }

    #[test]
    fn test_unknown_tab() {
        let registry = SessionRegistry::new();
        assert_eq!(resolve(&registry, TAB, None), None);
    }

    #[test]
    fn test_variant_for_media_id() {
        let mut registry = SessionRegistry::new();
        register_variant(&mut registry, TAB, id("1"), VariantDescriptor::new("https://video.twimg.com/one.mp4", 1.0));
        register_variant(&mut registry, TAB, id("2"), VariantDescriptor::new("https://video.twimg.com/two.mp4", 1.0));

        assert_eq!(
            resolve(&registry, TAB, Some(&id("1"))).as_deref(),
            Some("https://video.twimg.com/one.mp4")
        );
    }

    #[test]
    fn test_variant_last_seen_without_media_id() {
        let mut registry = SessionRegistry::new();
        register_variant(&mut registry, TAB, id("1"), VariantDescriptor::new("https://video.twimg.com/one.mp4", 1.0));
        register_variant(&mut registry, TAB, id("2"), VariantDescriptor::new("https://video.twimg.com/two.mp4", 1.0));

        assert_eq!(
            resolve(&registry, TAB, None).as_deref(),
            Some("https://video.twimg.com/two.mp4")
        );
        assert_eq!(
            resolve(&registry, TAB, Some(&id("3"))).as_deref(),
            Some("https://video.twimg.com/two.mp4")
        );
    }

    #[test]
    fn test_variants_win_over_raw_requests() {
        let mut registry = SessionRegistry::new();
        record_request(
            &mut registry,
            TAB,
            "https://video.twimg.com/amplify_video/1/vid/avc1/1920x1080/raw.mp4",
        );
        register_variant(&mut registry, TAB, id("2"), VariantDescriptor::new("https://video.twimg.com/api.mp4", 1.0));

        assert_eq!(
            resolve(&registry, TAB, Some(&id("1"))).as_deref(),
            Some("https://video.twimg.com/api.mp4")
        );
    }

    #[test]
    fn test_raw_request_for_media_id() {
        let mut registry = SessionRegistry::new();
        let wanted = "https://video.twimg.com/amplify_video/1/vid/avc1/1280x720/abc123.mp4";
        record_request(&mut registry, TAB, wanted);
        record_request(
            &mut registry,
            TAB,
            "https://video.twimg.com/amplify_video/2/vid/avc1/640x360/other.mp4",
        );

        assert_eq!(resolve(&registry, TAB, Some(&id("1"))).as_deref(), Some(wanted));
    }

    #[test]
    fn test_raw_last_seen_when_media_id_unknown() {
        let mut registry = SessionRegistry::new();
        let other = "https://video.twimg.com/amplify_video/2/vid/avc1/640x360/other.mp4";
        record_request(&mut registry, TAB, other);

        assert_eq!(resolve(&registry, TAB, Some(&id("1"))).as_deref(), Some(other));
    }

    #[test]
    fn test_raw_fallback_rejects_init_segment() {
        let mut registry = SessionRegistry::new();
        record_request(
            &mut registry,
            TAB,
            "https://video.twimg.com/amplify_video/1/vid/avc1/0/0/1280x720/init.mp4",
        );

        assert_eq!(resolve(&registry, TAB, None), None);
    }

    #[test]
    fn test_raw_fallback_rejects_playlist() {
        let mut registry = SessionRegistry::new();
        record_request(
            &mut registry,
            TAB,
            "https://video.twimg.com/amplify_video/1/pl/avc1/1280x720/abc.m3u8",
        );

        assert_eq!(resolve(&registry, TAB, Some(&id("1"))), None);
    }
}
