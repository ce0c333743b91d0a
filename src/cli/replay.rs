//! Capture log replay.

use std::path::Path;

use crate::engine::EngineEvent;
use crate::error::{Error, Result};

/// Events read from a capture log.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<EngineEvent>,
    /// Lines that could not be parsed.
    pub skipped: Vec<Error>,
}

/// Parse a JSON-lines capture. Blank lines are ignored; bad lines are
/// collected instead of aborting the replay.
pub fn parse_event_log(content: &str) -> EventLog {
    let mut log = EventLog::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<EngineEvent>(line) {
            Ok(event) => log.events.push(event),
            Err(e) => log.skipped.push(Error::InvalidEvent {
                line: index + 1,
                message: e.to_string(),
            }),
        }
    }

    log
}

impl EventLog {
    /// Read and parse a capture file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(parse_event_log(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_log() {
        let content = r#"
{"type": "request-observed", "tabId": 5, "url": "https://video.twimg.com/a.mp4"}

not json
{"type": "tab-closed", "tabId": 5}
"#;

        let log = parse_event_log(content);

        assert_eq!(log.events.len(), 2);
        assert_eq!(log.skipped.len(), 1);
        assert!(matches!(log.skipped[0], Error::InvalidEvent { line: 4, .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.jsonl");
        std::fs::write(&path, "{\"type\": \"tab-closed\", \"tabId\": 1}\n").unwrap();

        let log = EventLog::load(&path).await.unwrap();
        assert_eq!(log.events, vec![EngineEvent::TabClosed { tab_id: 1 }]);
    }
}
