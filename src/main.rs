use std::io::{self, BufRead, Write};
use std::sync::Arc;

use shopchat::chain::RagChain;
use shopchat::config::Settings;
use shopchat::history::InMemorySessionStore;
use shopchat::llm::GroqClient;
use shopchat::retrieval::AstraRetriever;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    shopchat::logging::init();

    let settings = Settings::from_env()?;
    let completion = Arc::new(GroqClient::new(&settings)?);
    let retriever = Arc::new(AstraRetriever::new(&settings)?);
    let sessions = Arc::new(InMemorySessionStore::new());

    let chain = RagChain::new(sessions, retriever, completion);

    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("starting chat session {}", session_id);
    println!("Ask about a product (or 'exit' to quit).");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let question = line.trim();

        if question.is_empty() {
            prompt(&mut stdout)?;
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        match chain.invoke(&session_id, question).await {
            Ok(answer) => println!("{}", answer),
            Err(err) => tracing::error!("invocation failed: {}", err),
        }

        prompt(&mut stdout)?;
    }

    Ok(())
}

fn prompt(stdout: &mut io::Stdout) -> io::Result<()> {
    print!("> ");
    stdout.flush()
}
