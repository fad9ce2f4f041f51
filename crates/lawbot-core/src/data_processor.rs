//! Corpus loading and chunking for vectorstore builds.
//!
//! Three input shapes are recognised under a data directory:
//! - `*.jsonl` with one `{instruction, output, source}` record per line
//! - `*_qa.json` arrays of `{question, answer}`; the source is the upper-cased
//!   file stem without the `_qa` suffix (`ipc_qa.json` -> `IPC`)
//! - plain `*.txt` documents; the source is the file stem
//!
//! Q&A records are rendered as `Question: ..\nAnswer: ..\nSource: ..` before
//! chunking, so retrieved passages carry their own provenance line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CorpusSettings;

/// A whole source record before chunking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    pub doc_id: String,
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    pub doc_id: String,
    pub source: String,
    pub text: String,
    pub chunk_index: usize,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Characters per chunk.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 800, chunk_overlap: 100 }
    }
}

impl From<&CorpusSettings> for ChunkingConfig {
    fn from(s: &CorpusSettings) -> Self {
        Self { chunk_size: s.chunk_size, chunk_overlap: s.chunk_overlap }
    }
}

#[derive(Deserialize)]
struct InstructionRecord {
    instruction: String,
    output: String,
    source: String,
}

#[derive(Deserialize)]
struct QaRecord {
    question: String,
    answer: String,
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let documents = self.load_documents(data_dir, None)?;
        Ok(self.chunk_documents(&documents))
    }

    /// Like [`process_directory`](Self::process_directory) but reads at most
    /// `limit` corpus files.
    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<DocumentChunk>> {
        let documents = self.load_documents(data_dir, Some(limit))?;
        Ok(self.chunk_documents(&documents))
    }

    pub fn load_documents(&self, data_dir: &Path, limit: Option<usize>) -> Result<Vec<CorpusDocument>> {
        let mut files = list_corpus_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no corpus files found");
            return Ok(vec![]);
        }
        if let Some(limit) = limit {
            if files.len() > limit {
                files.truncate(limit);
                info!(limit, "limited corpus to first files");
            }
        }
        let mut documents = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "loading corpus file {}/{}", file_index + 1, files.len());
            let loaded = self.load_file(file_path)?;
            documents.extend(loaded);
        }
        info!(files = files.len(), documents = documents.len(), "loaded legal corpus");
        Ok(documents)
    }

    pub fn chunk_documents(&self, documents: &[CorpusDocument]) -> Vec<DocumentChunk> {
        let chunks: Vec<DocumentChunk> = documents.iter().flat_map(|d| self.chunk_document(d)).collect();
        info!(documents = documents.len(), chunks = chunks.len(), "chunked corpus");
        chunks
    }

    pub fn chunk_document(&self, doc: &CorpusDocument) -> Vec<DocumentChunk> {
        let pieces = self.split_with_overlap(&doc.text);
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| DocumentChunk {
                doc_id: doc.doc_id.clone(),
                source: doc.source.clone(),
                text,
                chunk_index,
            })
            .collect()
    }

    fn load_file(&self, file_path: &Path) -> Result<Vec<CorpusDocument>> {
        let name = file_path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        let stem = file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let content = self.read_file_content(file_path)?;

        if name.ends_with(".jsonl") {
            let mut docs = Vec::new();
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() { continue; }
                match serde_json::from_str::<InstructionRecord>(line) {
                    Ok(r) => docs.push(CorpusDocument {
                        doc_id: format!("{}:{}", stem, line_no),
                        text: render_qa(&r.instruction, &r.output, &r.source),
                        source: r.source,
                    }),
                    Err(e) => warn!(file = %file_path.display(), line = line_no + 1, "skipping malformed record: {}", e),
                }
            }
            return Ok(docs);
        }

        if name.ends_with("_qa.json") {
            let source = stem.trim_end_matches("_qa").to_uppercase();
            let records: Vec<QaRecord> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse Q&A dataset {}", file_path.display()))?;
            return Ok(records
                .into_iter()
                .enumerate()
                .map(|(i, r)| CorpusDocument {
                    doc_id: format!("{}:{}", stem, i),
                    text: render_qa(&r.question, &r.answer, &source),
                    source: source.clone(),
                })
                .collect());
        }

        Ok(vec![CorpusDocument { doc_id: stem.clone(), source: stem, text: content }])
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    /// Character windows of `chunk_size` advancing by `chunk_size - chunk_overlap`.
    /// Whitespace-only windows are dropped.
    fn split_with_overlap(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let size = self.chunking_config.chunk_size.max(1);
        let overlap = self.chunking_config.chunk_overlap.min(size - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            if !chunk.trim().is_empty() { chunks.push(chunk); }
            if end >= chars.len() { break; }
            start = end - overlap;
        }
        chunks
    }
}

fn render_qa(question: &str, answer: &str, source: &str) -> String {
    format!("Question: {}\nAnswer: {}\nSource: {}", question, answer, source)
}

fn list_corpus_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        if name.ends_with(".jsonl") || name.ends_with("_qa.json") || name.ends_with(".txt") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> CorpusDocument {
        CorpusDocument { doc_id: "d".into(), source: "S".into(), text: text.into() }
    }

    #[test]
    fn windows_overlap_and_stop_at_the_end() {
        let p = DataProcessor::with_config(ChunkingConfig { chunk_size: 4, chunk_overlap: 1 });
        let chunks = p.chunk_document(&doc("abcdefghij"));
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij"]);
        assert_eq!(chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let p = DataProcessor::new();
        let chunks = p.chunk_document(&doc("Question: What is bail?"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "S");
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let p = DataProcessor::with_config(ChunkingConfig { chunk_size: 3, chunk_overlap: 0 });
        let chunks = p.chunk_document(&doc("धारा३०२"));
        assert_eq!(chunks.iter().map(|c| c.text.chars().count()).sum::<usize>(), "धारा३०२".chars().count());
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(DataProcessor::new().chunk_document(&doc("   \n  ")).is_empty());
    }
}
