//! SQL synthesizer: question text in, raw SQL text out, memoized.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{QueryCache, QueryKey};
use crate::error::PipelineError;
use crate::llm::CompletionModel;
use crate::prompts;

/// Cache-aside wrapper around the completion model: check, then call, then
/// insert. Only raw model output ever enters the cache, so normalization
/// re-runs on every hit.
pub struct SqlSynthesizer {
    model: Arc<dyn CompletionModel>,
    cache: Arc<QueryCache>,
    schema_text: String,
}

impl SqlSynthesizer {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        cache: Arc<QueryCache>,
        schema_text: String,
    ) -> Self {
        Self {
            model,
            cache,
            schema_text,
        }
    }

    /// Synthesize raw query text for a sanitized question, keyed on
    /// (sanitized input, result limit). A failed model call inserts nothing.
    pub async fn synthesize(
        &self,
        sanitized_input: &str,
        result_limit: u32,
    ) -> Result<String, PipelineError> {
        let key = QueryKey::new(sanitized_input, result_limit);
        if let Some(raw) = self.cache.get(&key).await {
            debug!("query cache hit for: {}", key.question);
            return Ok(raw);
        }

        let prompt = prompts::sql_synthesis_prompt(sanitized_input, &self.schema_text, result_limit);
        let raw = self.model.complete(&prompt).await?;
        info!("synthesized query ({} chars raw)", raw.len());
        self.cache.insert(key, raw.clone()).await;
        Ok(raw)
    }
}
