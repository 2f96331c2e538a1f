//! The per-turn pipeline and its retry controller.
//!
//! One turn runs sanitize → (cache-checked synthesize → normalize → execute
//! → compose) → transcript append, to completion, before the next turn is
//! accepted. The bracketed unit is what the retry controller reruns under
//! rate limiting. The transcript is appended exactly once, after the turn's
//! final outcome is known, so a retried attempt can never leave duplicate
//! entries behind.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::cache::QueryCache;
use crate::composer::ResponseComposer;
use crate::config::Config;
use crate::error::PipelineError;
use crate::executor::{render_rows, StatementExecutor};
use crate::llm::CompletionModel;
use crate::memory::TranscriptStore;
use crate::normalize::normalize;
use crate::retry::RetryPolicy;
use crate::sanitize::sanitize;
use crate::synthesizer::SqlSynthesizer;

/// Question-to-answer pipeline for a single chat session.
///
/// The cache handle is process-scoped and may be shared across pipelines;
/// the transcript entry under `session_id` belongs to this session alone.
pub struct QueryPipeline {
    synthesizer: SqlSynthesizer,
    composer: ResponseComposer,
    executor: Arc<dyn StatementExecutor>,
    memory: Arc<dyn TranscriptStore>,
    session_id: String,
    retry: RetryPolicy,
    result_limit: u32,
}

impl QueryPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: Arc<dyn CompletionModel>,
        executor: Arc<dyn StatementExecutor>,
        memory: Arc<dyn TranscriptStore>,
        cache: Arc<QueryCache>,
        schema_text: String,
        session_id: String,
        retry: RetryPolicy,
        result_limit: u32,
    ) -> Self {
        Self {
            synthesizer: SqlSynthesizer::new(Arc::clone(&model), cache, schema_text),
            composer: ResponseComposer::new(model),
            executor,
            memory,
            session_id,
            retry,
            result_limit,
        }
    }

    pub fn from_config(
        config: &Config,
        model: Arc<dyn CompletionModel>,
        executor: Arc<dyn StatementExecutor>,
        memory: Arc<dyn TranscriptStore>,
        cache: Arc<QueryCache>,
        session_id: String,
    ) -> Self {
        Self::new(
            model,
            executor,
            memory,
            cache,
            config.schema_text.clone(),
            session_id,
            RetryPolicy::new(
                config.max_retries,
                Duration::from_secs(config.retry_initial_seconds),
            ),
            config.result_limit,
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Drop this session's transcript (the chat surface's `clear` command).
    pub fn clear_session(&self) {
        self.memory.clear(&self.session_id);
    }

    /// Single entry point for the chat surface. Never returns an error:
    /// every failure path maps to a user-visible string, so the surface only
    /// handles plain text.
    pub async fn generate_response(&self, user_text: &str) -> String {
        let sanitized = sanitize(user_text);

        let mut attempt = 1;
        loop {
            match self.run_turn(&sanitized).await {
                Ok(answer) => return answer,
                Err(PipelineError::RateLimited { retry_after })
                    if attempt < self.retry.max_attempts =>
                {
                    let delay = retry_after.unwrap_or_else(|| self.retry.delay_for_attempt(attempt));
                    warn!(
                        "Rate limit exceeded, retrying in {} seconds (attempt {}/{})",
                        delay.as_secs(),
                        attempt,
                        self.retry.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Turn failed: {}", e);
                    return e.user_message();
                }
            }
        }
    }

    /// One atomic retry unit. No partial state survives a failed attempt:
    /// the transcript append is the last step, gated on compose succeeding.
    async fn run_turn(&self, sanitized: &str) -> Result<String, PipelineError> {
        let raw_query = self.synthesizer.synthesize(sanitized, self.result_limit).await?;
        let statement = normalize(&raw_query);
        info!("Executing query: {}", statement);

        let rows = self.executor.execute(&statement).await?;
        let results_text = render_rows(&rows);

        let history = self.memory.render(&self.session_id);
        let answer = self
            .composer
            .compose(&statement, &results_text, &history)
            .await?;

        self.memory.append(&self.session_id, sanitized, &results_text);
        Ok(answer)
    }
}
