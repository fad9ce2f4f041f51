use anyhow::{bail, Result};
use std::hash::Hasher;
use twox_hash::XxHash64;

use lawbot_core::traits::Embedder;

/// Deterministic feature-hashing embedder for tests and offline development.
///
/// Lowercased alphanumeric tokens are hashed to a bucket and a sign, then the
/// vector is L2-normalised. Texts sharing words land close together, which is
/// enough to drive retrieval without model weights. Text with no alphanumeric
/// token has no direction and is rejected rather than embedded as zero.
pub struct HashingEmbedder {
    dim: usize,
    id: String,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("fake:xxh64:d{}", dim) }
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[(h % self.dim as u64) as usize] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            bail!("no alphanumeric tokens to embed in {:?}", text);
        }
        v.iter_mut().for_each(|x| *x /= norm);
        Ok(v)
    }
}

impl Embedder for HashingEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}
