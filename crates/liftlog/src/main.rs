//! liftlog console bot.
//!
//! Reads `<sender_id> <text>` lines from stdin, runs each through the
//! orchestrator on its own task, and prints replies as `[sender_id] reply`.
//! Logs go to stderr.
//!
//! Run with: cargo run -p liftlog
//!
//! Configuration via .env file or environment variables:
//!   DATABASE_URL   - SQLite URL (default: sqlite:liftlog.db?mode=rwc)
//!   LIFTLOG_MODEL  - "groq" (default) or "echo" for an offline stand-in
//!   GROQ_API_KEY   - API key for Groq (required for "groq")
//!   RUST_LOG       - Log filter (default: liftlog=info,orchestrator=info,...)

mod console;

use std::env;
use std::sync::Arc;

use brain_core::LanguageModel;
use database::Database;
use groq_brain::GroqBrain;
use mock_brain::EchoModel;
use orchestrator::{Dispatcher, Orchestrator, OrchestratorConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::{parse_line, ConsoleSender};

const DEFAULT_DATABASE_URL: &str = "sqlite:liftlog.db?mode=rwc";

const DEFAULT_LOG_FILTER: &str = "liftlog=info,orchestrator=info,groq_brain=info,database=info";

fn build_model() -> Result<Arc<dyn LanguageModel>, Box<dyn std::error::Error>> {
    let kind = env::var("LIFTLOG_MODEL").unwrap_or_else(|_| "groq".to_string());
    match kind.as_str() {
        "echo" => {
            warn!("Using EchoModel, replies are not generated");
            Ok(Arc::new(EchoModel::new()))
        }
        "groq" => Ok(Arc::new(GroqBrain::from_env()?)),
        other => Err(format!("unknown LIFTLOG_MODEL: {}", other).into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let model = build_model()?;
    if !model.is_ready().await {
        return Err(format!("model backend {} is not ready", model.name()).into());
    }
    info!(model = model.name(), "Model backend ready");
    let orchestrator = Orchestrator::new(model, db.clone(), OrchestratorConfig::from_env());
    let dispatcher = Dispatcher::new(Arc::new(orchestrator), Arc::new(ConsoleSender::new()));

    info!("liftlog ready, reading `<sender_id> <text>` lines from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let Some(event) = parse_line(&line) else { continue };
                        let dispatcher = dispatcher.clone();
                        tasks.spawn(async move { dispatcher.dispatch(event).await });
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, finishing in-flight messages");
                break;
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    warn!("Dispatch task failed: {}", e);
                }
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Dispatch task failed: {}", e);
        }
    }

    db.close().await;
    info!("liftlog stopped");
    Ok(())
}
