//! Single-owner engine task.
//!
//! Every event and resolution request is funnelled through one channel into
//! the task that owns the [`Engine`], so a store mutation for a tab can never
//! interleave with that tab being closed.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::engine::{Engine, EngineEvent};
use crate::error::{Error, Result};
use crate::session::TabId;

enum Command {
    Event(EngineEvent),
    Resolve {
        tab: TabId,
        media_id: String,
        reply: oneshot::Sender<Option<String>>,
    },
}

/// Cloneable handle to a running engine task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Command::Resolve { tab, media_id, .. } => f
                .debug_struct("Resolve")
                .field("tab", tab)
                .field("media_id", media_id)
                .finish(),
        }
    }
}

impl EngineHandle {
    /// Move an engine into its own task.
    ///
    /// The task ends once every handle is dropped and hands the engine back
    /// through the join handle.
    pub fn spawn(engine: Engine) -> (Self, JoinHandle<Engine>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut engine = engine;

            while let Some(command) = rx.recv().await {
                match command {
                    Command::Event(event) => engine.handle_event(event),
                    Command::Resolve {
                        tab,
                        media_id,
                        reply,
                    } => {
                        // The requester may have given up; nothing to do then.
                        let _ = reply.send(engine.resolve(tab, &media_id));
                    }
                }
            }

            tracing::debug!("Engine task stopped");
            engine
        });

        (Self { tx }, task)
    }

    /// Queue an event. Events are applied in the order they are sent.
    pub fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(Command::Event(event))
            .map_err(|_| Error::EngineStopped)
    }

    /// Resolve the best downloadable URL for a media item.
    ///
    /// `tab_id` is the sender's tab as reported by the browser; a missing or
    /// negative id fails before any session is consulted. `Ok(None)` means
    /// nothing downloadable is known.
    pub async fn resolve(&self, tab_id: Option<i64>, media_id: &str) -> Result<Option<String>> {
        let tab = tab_id
            .ok_or(Error::MissingTabContext)
            .and_then(|raw| TabId::try_from(raw))?;

        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::Resolve {
                tab,
                media_id: media_id.to_string(),
                reply,
            })
            .map_err(|_| Error::EngineStopped)?;

        response.await.map_err(|_| Error::EngineStopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRESSIVE: &str = "https://video.twimg.com/amplify_video/999/vid/avc1/640x360/x.mp4";

    #[tokio::test]
    async fn test_events_then_resolve() {
        let (handle, _task) = EngineHandle::spawn(Engine::new());

        handle
            .send(EngineEvent::RequestObserved {
                tab_id: 5,
                url: PROGRESSIVE.to_string(),
            })
            .unwrap();
        assert_eq!(handle.resolve(Some(5), "").await.unwrap().as_deref(), Some(PROGRESSIVE));

        handle.send(EngineEvent::TabClosed { tab_id: 5 }).unwrap();
        assert_eq!(handle.resolve(Some(5), "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_tab_context() {
        let (handle, _task) = EngineHandle::spawn(Engine::new());

        assert!(matches!(
            handle.resolve(None, "1").await,
            Err(Error::MissingTabContext)
        ));
        assert!(matches!(
            handle.resolve(Some(-1), "1").await,
            Err(Error::MissingTabContext)
        ));
    }

    #[tokio::test]
    async fn test_engine_returned_when_handles_dropped() {
        let (handle, task) = EngineHandle::spawn(Engine::new());
        handle
            .send(EngineEvent::RequestObserved {
                tab_id: 1,
                url: PROGRESSIVE.to_string(),
            })
            .unwrap();
        drop(handle);

        let engine = task.await.unwrap();
        assert_eq!(engine.sessions().len(), 1);
    }

    #[test]
    fn test_send_after_stop() {
        let handle = tokio_test::block_on(async {
            let (handle, task) = EngineHandle::spawn(Engine::new());
            task.abort();
            let _ = task.await;
            handle
        });

        assert!(matches!(
            handle.send(EngineEvent::TabClosed { tab_id: 1 }),
            Err(Error::EngineStopped)
        ));
    }
}
