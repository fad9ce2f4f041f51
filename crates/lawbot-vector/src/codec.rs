//! `index.bin` layout, little-endian throughout:
//!
//! | bytes | field                      |
//! |-------|----------------------------|
//! | 8     | magic `LAWBOTVX`           |
//! | 4     | format version (u32)       |
//! | 4     | dim (u32)                  |
//! | 8     | count (u64)                |
//! | 4·n   | `count * dim` f32 values   |

use lawbot_core::error::{Error, Result};
use lawbot_core::traits::VectorIndex;

use crate::index::FlatL2Index;

pub const MAGIC: &[u8; 8] = b"LAWBOTVX";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 8 + 4 + 4 + 8;

pub fn encode(index: &FlatL2Index) -> Vec<u8> {
    let flat = index.as_flat();
    let mut out = Vec::with_capacity(HEADER_LEN + flat.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(index.dim() as u32).to_le_bytes());
    out.extend_from_slice(&(index.count() as u64).to_le_bytes());
    for v in flat { out.extend_from_slice(&v.to_le_bytes()); }
    out
}

fn corrupt(msg: impl std::fmt::Display) -> Error {
    Error::IndexUnavailable(format!("corrupt index file: {msg}"))
}

fn read_array<const N: usize>(bytes: &[u8], at: usize) -> Result<[u8; N]> {
    bytes
        .get(at..at + N)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| corrupt("truncated header"))
}

pub fn decode(bytes: &[u8]) -> Result<FlatL2Index> {
    if bytes.len() < HEADER_LEN { return Err(corrupt("truncated header")); }
    if &bytes[..8] != MAGIC { return Err(corrupt("bad magic")); }
    let version = u32::from_le_bytes(read_array(bytes, 8)?);
    if version != FORMAT_VERSION { return Err(corrupt(format!("unsupported version {version}"))); }
    let dim = u32::from_le_bytes(read_array(bytes, 12)?) as usize;
    let count = usize::try_from(u64::from_le_bytes(read_array(bytes, 16)?)).map_err(|_| corrupt("count overflows"))?;
    if dim == 0 { return Err(corrupt("zero dimension")); }

    let expected = count
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt("size overflows"))?;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != expected {
        return Err(corrupt(format!("expected {} payload bytes for {}x{}, found {}", expected, count, dim, payload.len())));
    }
    let data = payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    FlatL2Index::from_flat(dim, data)
}
