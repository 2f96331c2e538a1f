// tablechat/crates/tablechat/src/main.rs

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use uuid::Uuid;

use tablechat::cache::QueryCache;
use tablechat::chat;
use tablechat::config::Config;
use tablechat::executor::{MySqlExecutor, StatementExecutor};
use tablechat::llm::LlmClient;
use tablechat::memory::InMemoryTranscript;
use tablechat::pipeline::QueryPipeline;
use tablechat::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    config.print_config();

    // An unreachable database is fatal here, not a per-turn error.
    let executor = MySqlExecutor::new(config.database_url());
    executor
        .ping()
        .await
        .context("database unreachable at startup")?;
    let executor: Arc<dyn StatementExecutor> = Arc::new(executor);

    let model = Arc::new(LlmClient::from_config(&config));
    let memory = Arc::new(InMemoryTranscript::new());
    let cache = Arc::new(QueryCache::new(config.cache_capacity));
    let session_id = Uuid::new_v4().to_string();

    let pipeline =
        QueryPipeline::from_config(&config, model, executor, memory, cache, session_id);
    chat::run(pipeline).await
}
