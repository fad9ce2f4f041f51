use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Build record written next to the index as `manifest.json`.
///
/// `index_checksum` is the blake3 hex digest of `index.bin`. The manifest is
/// optional on load; stores built by other tools carry only the three data
/// files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub dim: usize,
    pub count: usize,
    pub embedder_id: String,
    pub index_checksum: String,
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    pub fn new(dim: usize, count: usize, embedder_id: impl Into<String>, index_bytes: &[u8]) -> Self {
        Self {
            format_version: crate::codec::FORMAT_VERSION,
            dim,
            count,
            embedder_id: embedder_id.into(),
            index_checksum: checksum(index_bytes),
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, index_bytes: &[u8]) -> bool {
        self.index_checksum == checksum(index_bytes)
    }
}

pub fn checksum(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
