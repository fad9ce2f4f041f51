//! Shared plumbing for the `lawbot` and `lawbot-indexer` binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing_subscriber::EnvFilter;

use lawbot_core::config::{Config, Settings};
use lawbot_core::types::ChatResponse;
use lawbot_rag::LawBotService;

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn load_settings() -> Result<Settings> {
    let config = Config::load().context("loading configuration")?;
    tracing::debug!(env = config.env_name(), "configuration loaded");
    Ok(config.settings()?)
}

/// One question per non-blank line; lines starting with `#` are comments.
pub fn read_questions(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Answer every question on the blocking pool, at most `concurrency` at a
/// time. Results keep input order.
pub async fn answer_batch(
    service: Arc<LawBotService>,
    questions: Vec<String>,
    concurrency: usize,
) -> Result<Vec<(String, ChatResponse)>> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(questions.len());
    for question in questions {
        let permit = permits.clone().acquire_owned().await?;
        let service = service.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let response = service.chat(&question, None);
            (question, response)
        }));
    }
    let mut out = Vec::with_capacity(handles.len());
    for h in handles {
        out.push(h.await?);
    }
    Ok(out)
}
