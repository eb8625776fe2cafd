//! Persisted vector index store.
//!
//! Owns the flat L2 index and its parallel chunk-text mapping. The pair is
//! persisted as two files in the store directory:
//!
//! - `index.bin` — the serialized [`FlatL2Index`]
//! - `chunks.json` — the ordered chunk texts, positionally aligned with
//!   the index's stored vectors
//!
//! The two artifacts are only loadable together: if either is missing, if
//! either fails to decode, or if their counts disagree, the store treats
//! the artifact as absent and rebuilds from the source document.
//! Corruption is self-healing; load failures never propagate.
//!
//! Rebuild-and-persist runs under a process-wide single-flight lock keyed
//! on the store directory, so concurrent first callers share one rebuild
//! instead of racing writers.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, OnceLock};
use tokio::sync::Mutex;

use crate::chunk::chunk_words;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;

const INDEX_FILE: &str = "index.bin";
const MAPPING_FILE: &str = "chunks.json";

/// Why a persisted artifact pair could not be loaded.
///
/// All three cases funnel into the same rebuild branch; distinguishing
/// them keeps the decision explicit and testable.
#[derive(Debug)]
enum LoadFailure {
    /// One or both artifact files do not exist. Not worth a warning.
    Missing,
    /// An artifact file exists but could not be read or decoded.
    Deserialize(String),
    /// Both artifacts decoded but their counts disagree.
    CountMismatch { index: usize, mapping: usize },
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadFailure::Missing => write!(f, "artifact files missing"),
            LoadFailure::Deserialize(msg) => write!(f, "artifact decode failed: {}", msg),
            LoadFailure::CountMismatch { index, mapping } => write!(
                f,
                "index and mapping size mismatch: {} vectors vs {} chunks",
                index, mapping
            ),
        }
    }
}

/// Produces a ready-to-search (index, mapping) pair, loading a valid
/// persisted artifact when one exists and rebuilding from the source
/// document otherwise.
pub struct IndexStore {
    document_path: PathBuf,
    store_dir: PathBuf,
    max_words: usize,
}

impl IndexStore {
    pub fn from_config(config: &Config) -> Self {
        Self {
            document_path: config.corpus.document.clone(),
            store_dir: config.store.dir.clone(),
            max_words: config.chunking.max_words,
        }
    }

    #[cfg(test)]
    fn new(document_path: PathBuf, store_dir: PathBuf, max_words: usize) -> Self {
        Self {
            document_path,
            store_dir,
            max_words,
        }
    }

    fn index_path(&self) -> PathBuf {
        self.store_dir.join(INDEX_FILE)
    }

    fn mapping_path(&self) -> PathBuf {
        self.store_dir.join(MAPPING_FILE)
    }

    /// Delete any persisted artifacts, forcing the next load to rebuild.
    pub fn clear(&self) -> Result<()> {
        for path in [self.index_path(), self.mapping_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Load the persisted pair, or rebuild it from the source document.
    ///
    /// On return the invariant `index.ntotal() == mapping.len()` holds and
    /// the artifacts on disk match the returned pair.
    pub async fn load_or_build(
        &self,
        embedder: &dyn Embedder,
    ) -> Result<(FlatL2Index, Vec<String>)> {
        let lock = rebuild_lock(&self.store_dir);
        let _guard = lock.lock().await;

        match self.try_load() {
            Ok(pair) => return Ok(pair),
            Err(LoadFailure::Missing) => {}
            Err(failure) => {
                eprintln!("Warning: index load failed ({}), rebuilding...", failure);
            }
        }

        self.rebuild(embedder).await
    }

    /// Attempt to load and validate both persisted artifacts.
    fn try_load(&self) -> std::result::Result<(FlatL2Index, Vec<String>), LoadFailure> {
        let index_path = self.index_path();
        let mapping_path = self.mapping_path();

        if !index_path.exists() || !mapping_path.exists() {
            return Err(LoadFailure::Missing);
        }

        let bytes = fs::read(&index_path).map_err(|e| LoadFailure::Deserialize(e.to_string()))?;
        let index =
            FlatL2Index::from_bytes(&bytes).map_err(|e| LoadFailure::Deserialize(e.to_string()))?;

        let raw = fs::read(&mapping_path).map_err(|e| LoadFailure::Deserialize(e.to_string()))?;
        let mapping: Vec<String> =
            serde_json::from_slice(&raw).map_err(|e| LoadFailure::Deserialize(e.to_string()))?;

        if index.ntotal() != mapping.len() {
            return Err(LoadFailure::CountMismatch {
                index: index.ntotal(),
                mapping: mapping.len(),
            });
        }

        Ok((index, mapping))
    }

    /// Rebuild the index and mapping from the source document and persist
    /// both artifacts.
    ///
    /// The first chunk's embedding establishes the index dimension; its
    /// failure is fatal because there is no dimension to validate against
    /// yet. Every later chunk that fails to embed, or embeds to the wrong
    /// dimension, is skipped with a warning and the rebuild continues.
    async fn rebuild(&self, embedder: &dyn Embedder) -> Result<(FlatL2Index, Vec<String>)> {
        if !self.document_path.exists() {
            return Err(RagError::DocumentNotFound(self.document_path.clone()));
        }

        let text = fs::read_to_string(&self.document_path)?;
        let chunks = chunk_words(&text, self.max_words);

        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let first = embedder.embed(&chunks[0]).await?;
        let dim = first.len();

        let mut index = FlatL2Index::new(dim);
        let mut mapping = Vec::with_capacity(chunks.len());

        index.add(&first)?;
        mapping.push(chunks[0].clone());

        for chunk in &chunks[1..] {
            match embedder.embed(chunk).await {
                Ok(vector) if vector.len() == dim => {
                    index.add(&vector)?;
                    mapping.push(chunk.clone());
                }
                Ok(vector) => {
                    eprintln!(
                        "Warning: skipping chunk with mismatched embedding dimension: expected {}, got {}",
                        dim,
                        vector.len()
                    );
                }
                Err(e) => {
                    eprintln!("Warning: skipping chunk that failed to embed: {}", e);
                }
            }
        }

        if index.ntotal() == 0 {
            return Err(RagError::NoValidEmbeddings);
        }

        self.persist(&index, &mapping)?;
        println!("index rebuilt: {} entries", index.ntotal());

        Ok((index, mapping))
    }

    /// Write both artifacts via temp-file-then-rename so a reader never
    /// observes a half-written file.
    fn persist(&self, index: &FlatL2Index, mapping: &[String]) -> Result<()> {
        fs::create_dir_all(&self.store_dir)?;

        let index_tmp = self.store_dir.join(format!("{}.tmp", INDEX_FILE));
        fs::write(&index_tmp, index.to_bytes())?;
        fs::rename(&index_tmp, self.index_path())?;

        let mapping_tmp = self.store_dir.join(format!("{}.tmp", MAPPING_FILE));
        fs::write(&mapping_tmp, serde_json::to_vec(mapping)?)?;
        fs::rename(&mapping_tmp, self.mapping_path())?;

        Ok(())
    }
}

/// Single-flight rebuild lock, one per artifact directory.
fn rebuild_lock(store_dir: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<StdMutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

    let locks = LOCKS.get_or_init(|| StdMutex::new(HashMap::new()));
    let mut map = locks.lock().unwrap_or_else(|e| e.into_inner());
    map.entry(store_dir.to_path_buf()).or_default().clone()
}
