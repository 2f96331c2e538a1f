//! Response composer: query + results + history in, plain-English answer out.

use std::sync::Arc;

use tracing::debug;

use crate::error::PipelineError;
use crate::llm::CompletionModel;
use crate::prompts;

pub struct ResponseComposer {
    model: Arc<dyn CompletionModel>,
}

impl ResponseComposer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// One model call. Failures propagate to the retry controller.
    pub async fn compose(
        &self,
        statement: &str,
        results_text: &str,
        history_text: &str,
    ) -> Result<String, PipelineError> {
        debug!(
            "composing answer ({} result chars, {} history chars)",
            results_text.len(),
            history_text.len()
        );
        let prompt = prompts::answer_prompt(statement, results_text, history_text);
        self.model.complete(&prompt).await
    }
}
