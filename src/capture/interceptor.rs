//! Response stream interception.
//!
//! The tap is passive: chunks reach the consumer exactly as they arrived,
//! and a copy is accumulated per request until the stream ends. Only then is
//! the body decoded and parsed.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde_json::Value;

use crate::engine::{EngineEvent, EngineHandle};
use crate::media::is_intercepted_api_url;
use crate::session::TabId;

/// Byte-order mark stripped before parsing, as a UTF-8 text decoder would.
const BOM: char = '\u{feff}';

/// Partially received response bodies, keyed by tab and request.
#[derive(Debug, Default)]
pub struct ResponseBuffers {
    pending: HashMap<(TabId, String), Vec<u8>>,
}

impl ResponseBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk to the body of a request.
    pub fn push_chunk(&mut self, tab: TabId, request_id: &str, bytes: &[u8]) {
        self.pending
            .entry((tab, request_id.to_string()))
            .or_default()
            .extend_from_slice(bytes);
    }

    /// Complete a request and parse its body.
    ///
    /// Returns `None` when nothing was buffered or the body is not JSON.
    pub fn finish(&mut self, tab: TabId, request_id: &str) -> Option<Value> {
        let body = self.pending.remove(&(tab, request_id.to_string()))?;
        parse_body(&body)
    }

    /// Drop every partial body belonging to a tab.
    pub fn discard_tab(&mut self, tab: TabId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(owner, _), _| *owner != tab);
        before - self.pending.len()
    }

    /// Number of responses still streaming.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Decode a complete body and parse it as one JSON document.
fn parse_body(body: &[u8]) -> Option<Value> {
    let decoded = String::from_utf8_lossy(body);
    let text: &str = &decoded;
    let text = text.strip_prefix(BOM).unwrap_or(text);

    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Discarding non-JSON response body ({} bytes): {}", body.len(), e);
            None
        }
    }
}

/// Identity of the response a [`TappedStream`] reports to the engine.
struct Tap {
    engine: EngineHandle,
    tab_id: i64,
    request_id: String,
}

impl Tap {
    fn send(&self, bytes: Vec<u8>, is_final: bool) {
        let event = EngineEvent::ResponseStreamChunk {
            tab_id: self.tab_id,
            request_id: self.request_id.clone(),
            bytes: bytes.into(),
            is_final,
        };

        // A stopped engine must never disturb the consumer.
        if self.engine.send(event).is_err() {
            tracing::debug!("Engine stopped, dropping chunk for {}", self.request_id);
        }
    }
}

/// A response body stream that copies every chunk to the engine.
///
/// Items are yielded unchanged. When the inner stream ends, a final empty
/// chunk marks the response as complete.
pub struct TappedStream<S> {
    inner: S,
    tap: Option<Tap>,
}

impl<S> TappedStream<S> {
    /// Whether this stream reports to the engine.
    pub fn is_tapped(&self) -> bool {
        self.tap.is_some()
    }
}

/// Wrap a response body stream.
///
/// Only responses from the GraphQL API that belong to a tab are tapped;
/// anything else passes through untouched.
pub fn tap_response<S>(
    engine: &EngineHandle,
    tab_id: i64,
    request_id: impl Into<String>,
    url: &str,
    stream: S,
) -> TappedStream<S> {
    let tap = (tab_id >= 0 && is_intercepted_api_url(url)).then(|| Tap {
        engine: engine.clone(),
        tab_id,
        request_id: request_id.into(),
    });

    TappedStream { inner: stream, tap }
}

impl<S, B, E> Stream for TappedStream<S>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    type Item = std::result::Result<B, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if let Some(tap) = &this.tap {
                    tap.send(chunk.as_ref().to_vec(), false);
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(None) => {
                if let Some(tap) = this.tap.take() {
                    tap.send(Vec::new(), true);
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: TabId = TabId::new(4);

    #[test]
    fn test_chunks_accumulate_until_finish() {
        let mut buffers = ResponseBuffers::new();
        buffers.push_chunk(TAB, "r1", br#"{"data": "#);
        buffers.push_chunk(TAB, "r1", br#"[1, 2]}"#);

        let value = buffers.finish(TAB, "r1").unwrap();
        assert_eq!(value["data"][1], 2);
        assert_eq!(buffers.pending(), 0);
    }

    #[test]
    fn test_split_multibyte_character() {
        let body = "{\"text\": \"caf\u{e9}\"}".as_bytes();
        let split = body.len() - 3;

        let mut buffers = ResponseBuffers::new();
        buffers.push_chunk(TAB, "r1", &body[..split]);
        buffers.push_chunk(TAB, "r1", &body[split..]);

        assert_eq!(buffers.finish(TAB, "r1").unwrap()["text"], "caf\u{e9}");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut buffers = ResponseBuffers::new();
        buffers.push_chunk(TAB, "r1", "\u{feff}{\"a\": 1}".as_bytes());
        assert_eq!(buffers.finish(TAB, "r1").unwrap()["a"], 1);
    }

    #[test]
    fn test_non_json_is_discarded() {
        let mut buffers = ResponseBuffers::new();
        buffers.push_chunk(TAB, "r1", b"<html>Moved</html>");

        assert!(buffers.finish(TAB, "r1").is_none());
        assert_eq!(buffers.pending(), 0);
    }

    #[test]
    fn test_finish_without_chunks() {
        let mut buffers = ResponseBuffers::new();
        assert!(buffers.finish(TAB, "missing").is_none());
    }

    fn body_chunks() -> Vec<std::io::Result<Vec<u8>>> {
        let body = serde_json::json!({
            "media": {
                "id_str": "31",
                "video_info": {"variants": [{
                    "bitrate": 950000,
                    "content_type": "video/mp4",
                    "url": "https://video.twimg.com/amplify_video/31/vid/avc1/720x720/sq.mp4"
                }]}
            }
        })
        .to_string()
        .into_bytes();

        body.chunks(7).map(|c| Ok(c.to_vec())).collect()
    }

    #[tokio::test]
    async fn test_tapped_stream_is_transparent() {
        use crate::engine::Engine;
        use futures::StreamExt;

        let (engine, _task) = EngineHandle::spawn(Engine::new());
        let chunks = body_chunks();
        let expected: Vec<Vec<u8>> = chunks.iter().map(|c| c.as_ref().unwrap().clone()).collect();

        let tapped = tap_response(
            &engine,
            6,
            "req-1",
            "https://x.com/i/api/graphql/abc/TweetDetail",
            futures::stream::iter(chunks),
        );
        assert!(tapped.is_tapped());

        let received: Vec<Vec<u8>> = tapped.map(|c| c.unwrap()).collect().await;
        assert_eq!(received, expected);

        assert_eq!(
            engine.resolve(Some(6), "31").await.unwrap().as_deref(),
            Some("https://video.twimg.com/amplify_video/31/vid/avc1/720x720/sq.mp4")
        );
    }

    #[tokio::test]
    async fn test_untapped_urls_pass_through() {
        use crate::engine::Engine;

        let (engine, _task) = EngineHandle::spawn(Engine::new());
        let stream = futures::stream::iter(body_chunks());

        let other = tap_response(&engine, 6, "r", "https://x.com/home", stream);
        assert!(!other.is_tapped());

        let stream = futures::stream::iter(body_chunks());
        let no_tab = tap_response(&engine, -1, "r", "https://x.com/i/api/graphql/a/B", stream);
        assert!(!no_tab.is_tapped());
    }

    #[test]
    fn test_requests_are_isolated() {
        let mut buffers = ResponseBuffers::new();
        buffers.push_chunk(TAB, "a", b"[1");
        buffers.push_chunk(TabId::new(5), "a", b"{}");
        buffers.push_chunk(TAB, "b", b"{}");
        buffers.push_chunk(TAB, "a", b"]");

        assert_eq!(buffers.finish(TAB, "a").unwrap()[0], 1);
        assert_eq!(buffers.discard_tab(TAB), 1);
        assert_eq!(buffers.pending(), 1);
    }
}
