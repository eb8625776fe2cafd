//! Top-k chunk retrieval.
//!
//! Embeds the query text and maps the nearest index positions back to
//! their chunk texts. The query embedding is the single point where an
//! embedding failure is always fatal — unlike a rebuild, there is no
//! chunk to skip.

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;

/// Retrieve the `k` chunks nearest to `query` by squared L2 distance.
///
/// The query vector's dimension is validated against the index before any
/// search runs. Positions outside the mapping are dropped rather than
/// surfaced, and fewer than `k` results is valid when the corpus is small.
pub async fn retrieve_chunks(
    embedder: &dyn Embedder,
    query: &str,
    index: &FlatL2Index,
    mapping: &[String],
    k: usize,
) -> Result<Vec<String>> {
    let query_vec = embedder.embed(query).await?;

    if query_vec.len() != index.dim() {
        return Err(RagError::DimensionMismatch {
            expected: index.dim(),
            got: query_vec.len(),
        });
    }

    let hits = index.search(&query_vec, k)?;

    Ok(hits
        .into_iter()
        .filter(|&(i, _)| i < mapping.len())
        .map(|(i, _)| mapping[i].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Stub that embeds every query to a fixed vector.
    struct FixedEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }
    }

    fn sample_pair() -> (FlatL2Index, Vec<String>) {
        let mut index = FlatL2Index::new(2);
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[0.0, 1.0]).unwrap();
        let mapping = vec!["alpha beta".to_string(), "gamma delta".to_string()];
        (index, mapping)
    }

    #[tokio::test]
    async fn test_nearest_chunk_wins() {
        let (index, mapping) = sample_pair();
        let embedder = FixedEmbedder {
            vector: vec![0.9, 0.1],
        };
        let chunks = retrieve_chunks(&embedder, "alpha", &index, &mapping, 1)
            .await
            .unwrap();
        assert_eq!(chunks, vec!["alpha beta"]);
    }

    #[tokio::test]
    async fn test_k_larger_than_corpus() {
        let (index, mapping) = sample_pair();
        let embedder = FixedEmbedder {
            vector: vec![0.0, 0.0],
        };
        let chunks = retrieve_chunks(&embedder, "anything", &index, &mapping, 10)
            .await
            .unwrap();
        assert_eq!(chunks.len(), 2);
        for c in &chunks {
            assert!(mapping.contains(c));
        }
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let (index, mapping) = sample_pair();
        let embedder = FixedEmbedder {
            vector: vec![1.0, 2.0, 3.0],
        };
        let err = retrieve_chunks(&embedder, "alpha", &index, &mapping, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        struct BrokenEmbedder;

        #[async_trait]
        impl Embedder for BrokenEmbedder {
            async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
                Err(RagError::Provider("stub outage".into()))
            }
        }

        let (index, mapping) = sample_pair();
        let err = retrieve_chunks(&BrokenEmbedder, "alpha", &index, &mapping, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Provider(_)));
    }

    #[tokio::test]
    async fn test_result_order_follows_distance() {
        let (index, mapping) = sample_pair();
        let embedder = FixedEmbedder {
            vector: vec![0.1, 0.9],
        };
        let chunks = retrieve_chunks(&embedder, "gamma", &index, &mapping, 2)
            .await
            .unwrap();
        assert_eq!(chunks, vec!["gamma delta", "alpha beta"]);
    }
}
