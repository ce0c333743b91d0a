//! Best-rendition retention.

use crate::media::{MediaId, VariantDescriptor};
use crate::session::{SessionRegistry, TabId};

/// Offer a rendition for a media id.
///
/// The stored rendition is only replaced by one with a strictly higher
/// score. The fallback slot takes every submission, winner or not, so it
/// always holds the most recent rendition seen in the tab. Returns true when
/// the per-id entry changed.
pub fn register_variant(
    registry: &mut SessionRegistry,
    tab: TabId,
    media_id: MediaId,
    descriptor: VariantDescriptor,
) -> bool {
    let session = registry.get_or_create(tab);

    let replace = match session.variants.get(&media_id) {
        Some(current) => descriptor.score() > current.score(),
        None => true,
    };

    if replace {
        tracing::debug!(
            "Tab {}: best rendition for {} is now {} (bitrate {})",
            tab,
            media_id,
            descriptor.url,
            descriptor.bitrate
        );
        session.variants.insert(media_id, descriptor.clone());
    }

    session.variants.set_last_seen(descriptor);
    replace
}
