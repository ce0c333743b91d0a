//! Rendition extraction from API payloads.

use std::collections::HashSet;

use serde_json::Value;

use crate::capture::scorer::register_variant;
use crate::media::{MediaId, VariantDescriptor};
use crate::session::{SessionRegistry, TabId};

/// Id fields checked on a media object, in priority order.
const ID_FIELDS: &[&str] = &["id_str", "id", "media_key"];

/// Walk a JSON payload and register every MP4 rendition it embeds.
///
/// Any object carrying `video_info.variants` is treated as a media entity,
/// wherever it sits in the document. Returns how many renditions were
/// submitted.
pub fn extract_variants(registry: &mut SessionRegistry, tab: TabId, payload: &Value) -> usize {
    let mut visited: HashSet<*const Value> = HashSet::new();
    let mut stack: Vec<&Value> = vec![payload];
    let mut submitted = 0;

    while let Some(value) = stack.pop() {
        if !visited.insert(value as *const Value) {
            continue;
        }

        match value {
            Value::Object(map) => {
                submitted += extract_media_entity(registry, tab, value);
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items.iter()),
            _ => {}
        }
    }

    submitted
}

fn extract_media_entity(registry: &mut SessionRegistry, tab: TabId, entity: &Value) -> usize {
    let Some(variants) = entity
        .get("video_info")
        .and_then(|info| info.get("variants"))
        .and_then(Value::as_array)
    else {
        return 0;
    };

    let Some(media_id) = media_id_of(entity) else {
        return 0;
    };

    let mut submitted = 0;
    for descriptor in variants.iter().filter_map(VariantDescriptor::from_json) {
        register_variant(registry, tab, media_id.clone(), descriptor);
        submitted += 1;
    }

    submitted
}

fn media_id_of(entity: &Value) -> Option<MediaId> {
    ID_FIELDS
        .iter()
        .filter_map(|field| entity.get(field))
        .find_map(MediaId::from_json)
}
