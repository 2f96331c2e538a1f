use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One completed exchange: the sanitized input and the rendered execution
/// results it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub input: String,
    pub output: String,
}

/// Session-scoped, append-only conversation transcript. Growth across a
/// session is unbounded; no truncation or summarization happens here.
pub trait TranscriptStore: Send + Sync {
    /// Record a completed turn. Called once per successful turn, after the
    /// turn's final outcome is known.
    fn append(&self, session_id: &str, input: &str, output: &str);

    /// The full transcript, oldest-first, as plain text for prompt embedding.
    fn render(&self, session_id: &str) -> String;

    fn turn_count(&self, session_id: &str) -> usize;

    fn clear(&self, session_id: &str);
}

#[derive(Clone)]
pub struct InMemoryTranscript {
    store: Arc<DashMap<String, Vec<TurnRecord>>>,
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self, session_id: &str) -> Vec<TurnRecord> {
        match self.store.get(session_id) {
            Some(turns) => turns.clone(),
            None => Vec::new(),
        }
    }
}

impl Default for InMemoryTranscript {
    fn default() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

impl TranscriptStore for InMemoryTranscript {
    fn append(&self, session_id: &str, input: &str, output: &str) {
        let mut entry = self.store.entry(session_id.to_string()).or_default();
        entry.push(TurnRecord {
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    fn render(&self, session_id: &str) -> String {
        match self.store.get(session_id) {
            Some(turns) => {
                let mut text = String::new();
                for turn in turns.iter() {
                    text.push_str("User: ");
                    text.push_str(&turn.input);
                    text.push('\n');
                    text.push_str("Assistant: ");
                    text.push_str(&turn.output);
                    text.push('\n');
                }
                text
            }
            None => String::new(),
        }
    }

    fn turn_count(&self, session_id: &str) -> usize {
        self.store.get(session_id).map(|t| t.len()).unwrap_or(0)
    }

    fn clear(&self, session_id: &str) {
        self.store.remove(session_id);
    }
}
