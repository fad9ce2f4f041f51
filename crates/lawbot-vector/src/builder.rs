use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

use lawbot_core::data_processor::DocumentChunk;
use lawbot_core::traits::{Embedder, VectorIndex};
use lawbot_core::types::PassageMeta;

use crate::index::FlatL2Index;
use crate::manifest::Manifest;
use crate::store::{PassageStore, VectorStore};

/// Embeds chunks in batches and assembles a [`FlatL2Index`] with its passages.
pub struct IndexBuilder<'a> {
    embedder: &'a dyn Embedder,
    batch_size: usize,
    show_progress: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder, batch_size: 32, show_progress: false }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn build(&self, chunks: &[DocumentChunk]) -> Result<(FlatL2Index, PassageStore)> {
        let dim = self.embedder.dim();
        let mut index = FlatL2Index::new(dim);
        let pb = self.progress_bar(chunks.len());

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .with_context(|| format!("embedding batch at row {}", index.count()))?;
            if vectors.len() != batch.len() {
                bail!("embedder returned {} vectors for {} chunks", vectors.len(), batch.len());
            }
            for v in &vectors {
                index.add(v)?;
            }
            pb.inc(batch.len() as u64);
        }
        pb.finish_with_message("embedded");

        let texts = chunks.iter().map(|c| c.text.clone()).collect();
        let metas = chunks
            .iter()
            .map(|c| PassageMeta {
                source: c.source.clone(),
                doc_id: Some(c.doc_id.clone()),
                chunk_index: Some(c.chunk_index),
            })
            .collect();
        let passages = PassageStore::new(texts, metas)?;
        info!(passages = passages.len(), dim, embedder = self.embedder.id(), "built flat index");
        Ok((index, passages))
    }

    pub fn build_and_save(&self, chunks: &[DocumentChunk], out_dir: &Path) -> Result<Manifest> {
        let (index, passages) = self.build(chunks)?;
        Ok(VectorStore::save(out_dir, &index, &passages, self.embedder.id())?)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress { return ProgressBar::hidden(); }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
