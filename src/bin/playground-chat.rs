// src/bin/playground-chat.rs
use std::io::Write;

use anyhow::Result;
use llm_playground::{
    config::ClientConfig,
    consumer::{ChatSession, HistoryMode, RelayClient, SubmitError, Target, TurnOutcome},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    let (target, mode) = match &config.collection {
        Some(collection) => (
            Target::Rag {
                collection: collection.clone(),
                top_k: config.top_k,
            },
            HistoryMode::SingleTurn,
        ),
        None => (Target::Chat, HistoryMode::Full),
    };

    let client = RelayClient::new(&config.base_url, target);
    let mut session = ChatSession::new(mode);
    eprintln!("Connected to {} ({:?}). Type a message, Ctrl-D to quit.", config.base_url, client.target());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = client
            .send(&mut session, &line, |fragment| {
                print!("{}", fragment);
                let _ = std::io::stdout().flush();
            })
            .await;

        match outcome {
            Ok(TurnOutcome::Completed(_)) => println!(),
            Ok(TurnOutcome::Failed(reason)) => {
                println!();
                eprintln!("error: {}", reason);
            }
            Err(SubmitError::EmptyInput) => continue,
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}
