use std::collections::BTreeSet;
use tracing::{debug, error, warn};

use lawbot_core::config::RagSettings;
use lawbot_core::error::{Error, Result};
use lawbot_core::traits::Embedder;
use lawbot_core::types::{Confidence, ContextBundle};
use lawbot_vector::VectorStore;

struct Backend {
    embedder: Box<dyn Embedder>,
    store: VectorStore,
}

/// Embeds a query, searches the store and keeps only hits under the
/// relevance threshold.
///
/// Without a store the retriever is "unavailable" and every call returns an
/// empty low-confidence bundle.
pub struct Retriever {
    backend: Option<Backend>,
    top_k: usize,
    threshold: f32,
}

impl Retriever {
    pub fn new(embedder: Box<dyn Embedder>, store: VectorStore, settings: &RagSettings) -> Result<Self> {
        if embedder.dim() != store.dim() {
            return Err(Error::IndexMisaligned(format!(
                "embedder {} produces {} dims but the index has {}",
                embedder.id(),
                embedder.dim(),
                store.dim()
            )));
        }
        if let Some(built_with) = store.embedder_id() {
            if built_with != embedder.id() {
                warn!(index = built_with, query = embedder.id(), "index was built with a different embedder");
            }
        }
        Ok(Self { backend: Some(Backend { embedder, store }), top_k: settings.top_k, threshold: settings.similarity_threshold })
    }

    pub fn unavailable(settings: &RagSettings) -> Self {
        Self { backend: None, top_k: settings.top_k, threshold: settings.similarity_threshold }
    }

    pub fn is_available(&self) -> bool { self.backend.is_some() }

    pub fn vector_count(&self) -> usize { self.backend.as_ref().map_or(0, |b| b.store.count()) }

    pub fn passage_count(&self) -> usize { self.backend.as_ref().map_or(0, |b| b.store.passages().len()) }

    pub fn embedder_id(&self) -> Option<&str> { self.backend.as_ref().map(|b| b.embedder.id()) }

    pub fn retrieve_context(&self, query: &str) -> ContextBundle { self.retrieve_top_k(query, self.top_k) }

    pub fn retrieve_top_k(&self, query: &str, top_k: usize) -> ContextBundle {
        let Some(backend) = &self.backend else { return ContextBundle::unavailable() };

        let vector = match backend.embedder.embed(query) {
            Ok(v) => v,
            Err(e) => {
                error!("query embedding failed: {:#}", e);
                return ContextBundle::empty(format!("RAG error: {}", Error::EmbeddingFailure(format!("{e:#}"))));
            }
        };
        let hits = match backend.store.search(&vector, top_k) {
            Ok(h) => h,
            Err(e) => {
                error!("vector search failed: {}", e);
                return ContextBundle::empty(format!("RAG error: {e}"));
            }
        };

        let mut blocks = Vec::new();
        let mut citations = BTreeSet::new();
        let mut matches = Vec::new();
        for hit in hits {
            let relevant = hit.distance < self.threshold;
            if !relevant { continue; }
            let Some(passage) = backend.store.passage(hit.passage_index) else { continue };
            blocks.push(format!("[{}] {}", blocks.len() + 1, passage.text));
            citations.insert(passage.source);
            matches.push(hit);
        }
        debug!(accepted = matches.len(), threshold = self.threshold, "retrieval finished");

        ContextBundle {
            context_text: blocks.join("\n\n"),
            citations,
            confidence: if matches.is_empty() { Confidence::Low } else { Confidence::High },
            message: format!("Retrieved {} relevant documents", matches.len()),
            matches,
        }
    }
}
