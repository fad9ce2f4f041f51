//! Embedding providers for LawBot.
//!
//! [`BertEmbedder`] runs a local BERT-family sentence encoder on candle.
//! [`HashingEmbedder`] is a deterministic stand-in selected by
//! `embedding.use_fake` or `APP_USE_FAKE_EMBEDDINGS=1`.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use lawbot_core::config::{expand_path, EmbeddingSettings};
pub use lawbot_core::traits::Embedder;

mod device;
mod hashing;
mod model;
mod pool;
mod tokenize;

pub use device::select_device;
pub use hashing::HashingEmbedder;
pub use model::BertEmbedder;
pub use pool::masked_mean_l2;
pub use tokenize::{tokenize_batch, TokenBatch};

pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if settings.use_fake || fake_embeddings_requested() {
        info!(dim = settings.dim, "using hashing embedder");
        return Ok(Box::new(HashingEmbedder::new(settings.dim)));
    }
    let dir = resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Box::new(BertEmbedder::load(&dir, settings.max_len)?))
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured { let p = expand_path(dir); if p.exists() { return Ok(p); } }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(dir = %p.display(), "using APP_MODEL_DIR"); return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { info!(dir = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    let root = Path::new("../models/all-MiniLM-L6-v2"); if root.exists() { return Ok(root.to_path_buf()); }
    let local = Path::new("models/all-MiniLM-L6-v2"); if local.exists() { return Ok(local.to_path_buf()); }
    Err(anyhow!("Could not locate embedding model directory (set embedding.model_dir or APP_MODEL_DIR)"))
}
