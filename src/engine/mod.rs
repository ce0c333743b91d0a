//! The media resolution engine.
//!
//! The [`Engine`] owns every tab session and every partially received API
//! response. It is a plain value mutated through `&mut self`; concurrent
//! producers go through [`EngineHandle`], which gives the engine a single
//! owning task.

pub mod events;
pub mod handle;
pub mod resolver;

pub use events::{ChunkData, EngineEvent};
pub use handle::EngineHandle;
pub use resolver::resolve;

use crate::capture::{extract_variants, record_request, ResponseBuffers};
use crate::media::MediaId;
use crate::session::{SessionRegistry, TabId};

/// Session state plus in-flight response bodies.
#[derive(Debug, Default)]
pub struct Engine {
    sessions: SessionRegistry,
    responses: ResponseBuffers,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one observed event.
    pub fn handle_event(&mut self, event: EngineEvent) {
        let Ok(tab) = TabId::try_from(event.tab_id()) else {
            tracing::trace!("Ignoring event without tab: {:?}", event);
            return;
        };

        match event {
            EngineEvent::RequestObserved { url, .. } => {
                record_request(&mut self.sessions, tab, &url);
            }
            EngineEvent::ResponseStreamChunk {
                request_id,
                bytes,
                is_final,
                ..
            } => self.on_response_chunk(tab, &request_id, bytes.as_ref(), is_final),
            EngineEvent::TabClosed { .. } => self.on_tab_closed(tab),
        }
    }

    fn on_response_chunk(&mut self, tab: TabId, request_id: &str, bytes: &[u8], is_final: bool) {
        self.responses.push_chunk(tab, request_id, bytes);

        if !is_final {
            return;
        }

        if let Some(payload) = self.responses.finish(tab, request_id) {
            let found = extract_variants(&mut self.sessions, tab, &payload);
            if found > 0 {
                tracing::debug!("Tab {}: {} renditions in response {}", tab, found, request_id);
            }
        }
    }

    fn on_tab_closed(&mut self, tab: TabId) {
        let had_session = self.sessions.remove(tab);
        let dropped = self.responses.discard_tab(tab);

        if had_session || dropped > 0 {
            tracing::debug!("Tab {} closed, dropped {} pending responses", tab, dropped);
        }
    }

    /// Resolve the best downloadable URL for a media item in a tab.
    ///
    /// An empty `media_id` means the caller has no id and takes whatever was
    /// seen last.
    pub fn resolve(&self, tab: TabId, media_id: &str) -> Option<String> {
        let media_id = MediaId::normalize(media_id);
        resolve(&self.sessions, tab, media_id.as_ref())
    }

    /// Read access to the tab sessions.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Number of responses still streaming.
    pub fn pending_responses(&self) -> usize {
        self.responses.pending()
    }
}
