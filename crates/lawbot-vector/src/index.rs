use std::cmp::Ordering;

use lawbot_core::error::{Error, Result};
use lawbot_core::traits::VectorIndex;
use lawbot_core::types::ScoredMatch;

/// Exhaustive squared-L2 index over row-major `f32` vectors.
///
/// Row `i` is passage `i`. Search scans every row, so results are exact.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self { Self { dim, data: Vec::new() } }

    pub fn from_flat(dim: usize, data: Vec<f32>) -> Result<Self> {
        if dim == 0 { return Err(Error::IndexUnavailable("index dimension is zero".into())); }
        if data.len() % dim != 0 {
            return Err(Error::IndexUnavailable(format!("{} floats do not divide into rows of {}", data.len(), dim)));
        }
        Ok(Self { dim, data })
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::IndexMisaligned(format!("vector has {} dims, index has {}", vector.len(), self.dim)));
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    pub fn as_flat(&self) -> &[f32] { &self.data }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| { let d = x - y; d * d }).sum()
}

fn by_distance_then_index(a: &ScoredMatch, b: &ScoredMatch) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.passage_index.cmp(&b.passage_index))
}

impl VectorIndex for FlatL2Index {
    fn dim(&self) -> usize { self.dim }

    fn count(&self) -> usize { self.data.len() / self.dim.max(1) }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredMatch>> {
        if query.len() != self.dim {
            return Err(Error::IndexMisaligned(format!("query has {} dims, index has {}", query.len(), self.dim)));
        }
        if k == 0 || self.data.is_empty() { return Ok(vec![]); }
        let mut hits: Vec<ScoredMatch> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(passage_index, row)| ScoredMatch { passage_index, distance: squared_l2(query, row) })
            .collect();
        if hits.len() > k {
            hits.select_nth_unstable_by(k - 1, by_distance_then_index);
            hits.truncate(k);
        }
        hits.sort_by(by_distance_then_index);
        Ok(hits)
    }
}
