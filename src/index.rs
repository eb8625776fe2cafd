//! Exact flat L2 vector index.
//!
//! Stores N vectors of a fixed dimension in one flattened `f32` buffer and
//! answers top-k queries by scanning every stored vector and ranking by
//! squared Euclidean distance (lower = more similar). No normalization is
//! applied before insertion or search, so cosine-style semantics do not
//! apply here.
//!
//! The on-disk encoding is a small binary blob: a `dim`/`count` header
//! followed by the vector data as little-endian `f32` bytes.

use anyhow::{bail, Result as AnyResult};

use crate::error::{RagError, Result};

/// An exact nearest-neighbor index over squared L2 distance.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// The fixed vector dimension of this index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors.
    pub fn ntotal(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// Append a vector. Fails if its dimension does not match the index.
    pub fn add(&mut self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                expected: self.dim,
                got: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Top-k positions by ascending squared L2 distance to `query`.
    ///
    /// Returns at most `min(k, ntotal)` (position, distance) pairs. Ties
    /// resolve to scan order; callers must not rely on a particular tie
    /// order. Fails with a dimension mismatch rather than scanning when
    /// the query vector has the wrong length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, stored)| (i, l2_squared(query, stored)))
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits)
    }

    /// Encode as `[dim: u32 LE][count: u32 LE][dim*count f32 LE]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.data.len() * 4);
        bytes.extend_from_slice(&(self.dim as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.ntotal() as u32).to_le_bytes());
        for &v in &self.data {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    /// Decode an index previously written by [`FlatL2Index::to_bytes`].
    ///
    /// Fails on a truncated header, a payload length that disagrees with
    /// the header, or a zero dimension with a nonzero count.
    pub fn from_bytes(bytes: &[u8]) -> AnyResult<Self> {
        if bytes.len() < 8 {
            bail!("index file too short: {} bytes", bytes.len());
        }

        let dim = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let payload = &bytes[8..];

        if dim == 0 && count > 0 {
            bail!("index header invalid: zero dimension with {} vectors", count);
        }

        let expected = dim * count * 4;
        if payload.len() != expected {
            bail!(
                "index payload length mismatch: expected {} bytes, got {}",
                expected,
                payload.len()
            );
        }

        let data: Vec<f32> = payload
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { dim, data })
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatL2Index {
        let mut index = FlatL2Index::new(2);
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[0.0, 1.0]).unwrap();
        index.add(&[1.0, 1.0]).unwrap();
        index
    }

    #[test]
    fn test_add_and_count() {
        let index = sample_index();
        assert_eq!(index.dim(), 2);
        assert_eq!(index.ntotal(), 3);
    }

    #[test]
    fn test_add_wrong_dimension() {
        let mut index = FlatL2Index::new(2);
        let err = index.add(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = sample_index();
        let hits = index.search(&[0.9, 0.1], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![0, 2, 1]);
        // d([0.9,0.1],[1,0]) = 0.01 + 0.01 = 0.02
        assert!((hits[0].1 - 0.02).abs() < 1e-6);
        // d([0.9,0.1],[0,1]) = 0.81 + 0.81 = 1.62
        assert!((hits[2].1 - 1.62).abs() < 1e-6);
    }

    #[test]
    fn test_search_k_exceeds_count() {
        let index = sample_index();
        let hits = index.search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_search_wrong_dimension() {
        let index = sample_index();
        let err = index.search(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let index = sample_index();
        let restored = FlatL2Index::from_bytes(&index.to_bytes()).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_bytes_roundtrip_empty() {
        let index = FlatL2Index::new(4);
        let restored = FlatL2Index::from_bytes(&index.to_bytes()).unwrap();
        assert_eq!(restored.ntotal(), 0);
        assert_eq!(restored.dim(), 4);
    }

    #[test]
    fn test_from_bytes_truncated_header() {
        assert!(FlatL2Index::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_from_bytes_payload_mismatch() {
        let mut bytes = sample_index().to_bytes();
        bytes.truncate(bytes.len() - 4);
        assert!(FlatL2Index::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_from_bytes_zero_dim_nonzero_count() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&5u32.to_le_bytes());
        assert!(FlatL2Index::from_bytes(&bytes).is_err());
    }
}
