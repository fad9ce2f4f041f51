use crate::types::ScoredMatch;

pub trait Embedder: Send + Sync {
    /// Stable identifier for the model (e.g., `bert:all-MiniLM-L6-v2:d384`).
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for query"))
    }
}

/// Exact nearest-neighbour search over a fixed-dimension vector set.
pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;
    fn count(&self) -> usize;
    /// At most `k` matches, ascending by distance.
    fn search(&self, query: &[f32], k: usize) -> crate::error::Result<Vec<ScoredMatch>>;
}

pub trait AnswerGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str, max_tokens: usize) -> anyhow::Result<String>;
}
