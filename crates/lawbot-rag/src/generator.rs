//! Answer generation over any OpenAI-compatible `/chat/completions` endpoint.
//!
//! The HTTP call is async. [`AnswerGenerator::generate`] drives it to
//! completion on a private current-thread runtime on its own thread, so it is
//! safe to call from plain threads, `spawn_blocking`, or inside an async task.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use tracing::debug;

use lawbot_core::config::GeneratorSettings;
use lawbot_core::traits::AnswerGenerator;

use crate::prompt::SYSTEM_PROMPT;

pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    top_p: f32,
}

impl OpenAiCompatibleGenerator {
    /// `None` when no endpoint is configured.
    pub fn from_settings(settings: &GeneratorSettings) -> Result<Option<Self>> {
        let Some(endpoint) = settings.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder().build().context("building HTTP client")?;
        Ok(Some(Self {
            client,
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            temperature: settings.temperature,
            top_p: settings.top_p,
        }))
    }

    pub fn url(&self) -> &str { &self.url }

    pub fn request_body(&self, prompt: &str, max_tokens: usize) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": max_tokens,
            "temperature": self.temperature,
            "top_p": self.top_p,
        })
    }
}

/// Content of the first choice, trimmed. Empty completions are errors.
pub fn completion_text(response: &Value) -> Result<String> {
    let choice = response["choices"].get(0).ok_or_else(|| anyhow!("No choices in response"))?;
    let text = choice["message"]["content"].as_str().map(str::trim).unwrap_or_default();
    if text.is_empty() { bail!("Empty completion"); }
    Ok(text.to_string())
}

impl AnswerGenerator for OpenAiCompatibleGenerator {
    fn name(&self) -> &str { &self.model }

    fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let rt = tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                        .context("building generator runtime")?;
                    rt.block_on(self.request(prompt, max_tokens))
                })
                .join()
                .map_err(|_| anyhow!("generator thread panicked"))?
        })
    }
}

impl OpenAiCompatibleGenerator {
    async fn request(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        debug!(url = %self.url, model = %self.model, "requesting completion");
        let mut req = self.client.post(&self.url).json(&self.request_body(prompt, max_tokens));
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }
        let resp = req.send().await.with_context(|| format!("connection to {} failed", self.url))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("generator API error {}: {}", status, text);
        }
        let body: Value = resp.json().await.context("decoding completion")?;
        completion_text(&body)
    }
}
