//! Events consumed by the engine.

use serde::{Deserialize, Serialize};

/// Raw bytes of one response chunk.
///
/// Serialized as a byte array. Hand-written capture logs may give the chunk
/// as a plain string instead, which is taken as its UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ChunkRepr")]
pub struct ChunkData(pub Vec<u8>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ChunkRepr {
    Bytes(Vec<u8>),
    Text(String),
}

impl From<ChunkRepr> for ChunkData {
    fn from(repr: ChunkRepr) -> Self {
        match repr {
            ChunkRepr::Bytes(bytes) => ChunkData(bytes),
            ChunkRepr::Text(text) => ChunkData(text.into_bytes()),
        }
    }
}

impl From<Vec<u8>> for ChunkData {
    fn from(bytes: Vec<u8>) -> Self {
        ChunkData(bytes)
    }
}

impl AsRef<[u8]> for ChunkData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Network and lifecycle events observed by the browser.
///
/// Tab ids are kept as reported; negative ids mark traffic outside any tab
/// and are ignored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineEvent {
    /// A request to the media host was issued.
    #[serde(rename_all = "camelCase")]
    RequestObserved { tab_id: i64, url: String },

    /// A chunk of a tapped API response arrived.
    #[serde(rename_all = "camelCase")]
    ResponseStreamChunk {
        tab_id: i64,
        request_id: String,
        #[serde(default)]
        bytes: ChunkData,
        #[serde(default)]
        is_final: bool,
    },

    /// A tab was closed.
    #[serde(rename_all = "camelCase")]
    TabClosed { tab_id: i64 },
}

impl EngineEvent {
    /// Tab the event belongs to.
    pub fn tab_id(&self) -> i64 {
        match self {
            EngineEvent::RequestObserved { tab_id, .. }
            | EngineEvent::ResponseStreamChunk { tab_id, .. }
            | EngineEvent::TabClosed { tab_id } => *tab_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_observed() {
        let event: EngineEvent = serde_json::from_str(
            r#"{"type": "request-observed", "tabId": 5, "url": "https://video.twimg.com/a.mp4"}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            EngineEvent::RequestObserved {
                tab_id: 5,
                url: "https://video.twimg.com/a.mp4".to_string()
            }
        );
    }

    #[test]
    fn test_parse_chunk_as_text_or_bytes() {
        let text: EngineEvent = serde_json::from_str(
            r#"{"type": "response-stream-chunk", "tabId": 1, "requestId": "r", "bytes": "{}", "isFinal": true}"#,
        )
        .unwrap();
        let bytes: EngineEvent = serde_json::from_str(
            r#"{"type": "response-stream-chunk", "tabId": 1, "requestId": "r", "bytes": [123, 125], "isFinal": true}"#,
        )
        .unwrap();

        assert_eq!(text, bytes);
    }

    #[test]
    fn test_chunk_defaults() {
        let event: EngineEvent = serde_json::from_str(
            r#"{"type": "response-stream-chunk", "tabId": 1, "requestId": "r"}"#,
        )
        .unwrap();

        match event {
            EngineEvent::ResponseStreamChunk {
                bytes, is_final, ..
            } => {
                assert!(bytes.0.is_empty());
                assert!(!is_final);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_tab_closed() {
        let json = serde_json::to_value(EngineEvent::TabClosed { tab_id: 9 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "tab-closed", "tabId": 9}));
        assert_eq!(EngineEvent::TabClosed { tab_id: 9 }.tab_id(), 9);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        assert!(serde_json::from_str::<EngineEvent>(r#"{"type": "tab-opened", "tabId": 1}"#).is_err());
    }
}
