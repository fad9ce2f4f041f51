use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Vectorstore missing or unreadable. The retriever degrades to no-RAG mode.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// Vectorstore present but its parts disagree (cardinality or dimension).
    /// Fatal at startup.
    #[error("Index misaligned: {0}")]
    IndexMisaligned(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    /// Shown to the tool caller verbatim.
    #[error("{0}")]
    InvalidToolParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
