//! Raw media request tracking.

use crate::media::{is_media_request, MediaId};
use crate::session::{RawRequestRecord, SessionRegistry, TabId};

/// Record a request to the media host.
///
/// The newest observation for a media id always replaces the previous one,
/// even when the older URL pointed at a better rendition. Requests without a
/// recognizable id only refresh the fallback slot. Returns false when the URL
/// is not media traffic.
pub fn record_request(registry: &mut SessionRegistry, tab: TabId, url: &str) -> bool {
    if !is_media_request(url) {
        return false;
    }

    let media_id = MediaId::from_media_url(url);
    let record = RawRequestRecord::now(url);
    let session = registry.get_or_create(tab);

    match media_id {
        Some(id) => {
            tracing::debug!("Tab {}: media request for {}: {}", tab, id, url);
            session.requests.insert(id, record.clone());
        }
        None => tracing::debug!("Tab {}: media request without id: {}", tab, url),
    }

    session.requests.set_last_seen(record);
    true
}
