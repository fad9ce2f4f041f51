//! Persistent exact-search vectorstore.
//!
//! A store directory holds `index.bin` (row-major f32 vectors), `chunks.json`
//! (passage texts), `metadata.json` (one `{source, ..}` record per passage) and
//! `manifest.json` (dimension, count, embedder id, blake3 checksum). Row `i` of
//! each file describes passage `i`.

mod builder;
mod codec;
mod index;
mod manifest;
mod store;

pub use builder::IndexBuilder;
pub use codec::{decode, encode, FORMAT_VERSION, MAGIC};
pub use index::{squared_l2, FlatL2Index};
pub use lawbot_core::traits::VectorIndex;
pub use manifest::{checksum, Manifest};
pub use store::{PassageStore, VectorStore, CHUNKS_FILE, INDEX_FILE, MANIFEST_FILE, METADATA_FILE};
