//! Terminal chat surface: a turn-by-turn transcript over stdin/stdout.
//!
//! Boundary glue around the pipeline's single entry point; everything it
//! renders is plain text the pipeline already produced.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::pipeline::QueryPipeline;

const BANNER: &str = "School Database Q&A Bot\n\
Ask about students, parents, marks, scholarships, or classes, and get answers in plain English!\n\
Type 'exit' to quit, 'clear' to reset the conversation.\n";

pub async fn run(pipeline: QueryPipeline) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(BANNER.as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "exit" | "quit" => break,
            "clear" => {
                pipeline.clear_session();
                stdout.write_all(b"Conversation cleared.\n").await?;
                continue;
            }
            _ => {}
        }

        let answer = pipeline.generate_response(input).await;
        stdout.write_all(answer.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    info!("Chat session {} ended", pipeline.session_id());
    Ok(())
}
