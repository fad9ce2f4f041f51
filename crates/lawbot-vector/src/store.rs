use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use lawbot_core::error::{Error, Result};
use lawbot_core::traits::VectorIndex;
use lawbot_core::types::{Passage, PassageMeta, ScoredMatch};

use crate::codec;
use crate::index::FlatL2Index;
use crate::manifest::Manifest;

pub const INDEX_FILE: &str = "index.bin";
pub const CHUNKS_FILE: &str = "chunks.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Passage texts and their metadata, addressed by vector row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassageStore {
    texts: Vec<String>,
    metas: Vec<PassageMeta>,
}

impl PassageStore {
    pub fn new(texts: Vec<String>, metas: Vec<PassageMeta>) -> Result<Self> {
        if texts.len() != metas.len() {
            return Err(Error::IndexMisaligned(format!(
                "{} chunks but {} metadata records",
                texts.len(),
                metas.len()
            )));
        }
        Ok(Self { texts, metas })
    }

    pub fn len(&self) -> usize { self.texts.len() }

    pub fn is_empty(&self) -> bool { self.texts.is_empty() }

    pub fn get(&self, index: usize) -> Option<Passage> {
        let text = self.texts.get(index)?;
        let meta = self.metas.get(index)?;
        Some(Passage { index, text: text.clone(), source: meta.source.clone() })
    }

    pub fn texts(&self) -> &[String] { &self.texts }

    pub fn metas(&self) -> &[PassageMeta] { &self.metas }
}

/// A loaded vectorstore: index plus the passage rows it addresses.
///
/// Construction guarantees `index.count() == passages.len()`, so every search
/// hit resolves to a passage.
pub struct VectorStore {
    index: Box<dyn VectorIndex>,
    passages: PassageStore,
    manifest: Option<Manifest>,
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("dim", &self.index.dim())
            .field("count", &self.index.count())
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl VectorStore {
    pub fn from_parts(index: Box<dyn VectorIndex>, passages: PassageStore) -> Result<Self> {
        if index.count() != passages.len() {
            return Err(Error::IndexMisaligned(format!(
                "index holds {} vectors but {} passages are stored",
                index.count(),
                passages.len()
            )));
        }
        Ok(Self { index, passages, manifest: None })
    }

    /// Load `index.bin`, `chunks.json` and `metadata.json` from `dir`.
    ///
    /// Missing or unreadable artifacts yield [`Error::IndexUnavailable`];
    /// artifacts that disagree on size or dimension yield
    /// [`Error::IndexMisaligned`].
    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        if !index_path.is_file() {
            return Err(Error::IndexUnavailable(format!("no vectorstore at {}", dir.display())));
        }
        let bytes = fs::read(&index_path).map_err(|e| unavailable(&index_path, e))?;

        let manifest: Option<Manifest> = match read_json_optional(&dir.join(MANIFEST_FILE))? {
            Some(m) => Some(m),
            None => {
                warn!(dir = %dir.display(), "vectorstore has no manifest; skipping checksum");
                None
            }
        };
        if let Some(m) = &manifest {
            if !m.matches(&bytes) {
                return Err(Error::IndexUnavailable(format!(
                    "corrupt index file: checksum mismatch for {}",
                    index_path.display()
                )));
            }
        }

        let index = codec::decode(&bytes)?;
        if let Some(m) = &manifest {
            if m.dim != index.dim() || m.count != index.count() {
                return Err(Error::IndexMisaligned(format!(
                    "manifest says {}x{}, index is {}x{}",
                    m.count,
                    m.dim,
                    index.count(),
                    index.dim()
                )));
            }
        }

        let texts: Vec<String> = read_json(&dir.join(CHUNKS_FILE))?;
        let metas: Vec<PassageMeta> = read_json(&dir.join(METADATA_FILE))?;
        let passages = PassageStore::new(texts, metas)?;

        let mut store = Self::from_parts(Box::new(index), passages)?;
        store.manifest = manifest;
        info!(dir = %dir.display(), passages = store.count(), dim = store.dim(), "loaded vectorstore");
        Ok(store)
    }

    /// Write all four artifacts into `dir`, creating it if needed.
    pub fn save(dir: &Path, index: &FlatL2Index, passages: &PassageStore, embedder_id: &str) -> Result<Manifest> {
        if index.count() != passages.len() {
            return Err(Error::IndexMisaligned(format!(
                "refusing to save {} vectors with {} passages",
                index.count(),
                passages.len()
            )));
        }
        fs::create_dir_all(dir)?;
        let bytes = codec::encode(index);
        fs::write(dir.join(INDEX_FILE), &bytes)?;
        fs::write(dir.join(CHUNKS_FILE), serde_json::to_vec(passages.texts())?)?;
        fs::write(dir.join(METADATA_FILE), serde_json::to_vec(passages.metas())?)?;
        let manifest = Manifest::new(index.dim(), index.count(), embedder_id, &bytes);
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;
        info!(dir = %dir.display(), count = index.count(), dim = index.dim(), "saved vectorstore");
        Ok(manifest)
    }

    pub fn dim(&self) -> usize { self.index.dim() }

    pub fn count(&self) -> usize { self.index.count() }

    pub fn passages(&self) -> &PassageStore { &self.passages }

    pub fn passage(&self, index: usize) -> Option<Passage> { self.passages.get(index) }

    pub fn manifest(&self) -> Option<&Manifest> { self.manifest.as_ref() }

    pub fn embedder_id(&self) -> Option<&str> { self.manifest.as_ref().map(|m| m.embedder_id.as_str()) }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredMatch>> { self.index.search(query, k) }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::IndexUnavailable(format!("{}: {}", path.display(), e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).map_err(|e| unavailable(path, e))?;
    serde_json::from_slice(&raw).map_err(|e| unavailable(path, format!("corrupt: {e}")))
}

fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() { return Ok(None); }
    read_json(path).map(Some)
}
