//! Query orchestrator: the end-to-end `answer(query)` operation.
//!
//! Composes the index store, retriever, prompt builder, and completion
//! client. The store is loaded (or rebuilt) on every call — there is no
//! in-memory cross-call cache, so the persisted artifact is the only
//! shared state and a query can never observe a stale index.

use serde::Serialize;

use crate::completion::{Completer, RemoteCompleter};
use crate::config::Config;
use crate::embedding::{Embedder, RemoteEmbedder};
use crate::error::Result;
use crate::prompt::build_prompt;
use crate::retrieve::retrieve_chunks;
use crate::store::IndexStore;

/// The answer plus the chunks it was grounded on, returned to the caller
/// for transparency and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub retrieved_chunks: Vec<String>,
}

/// Answer a question using the configured remote providers.
///
/// `k_override` bounds retrieval for CLI use; the HTTP layer always passes
/// `None` and takes `retrieval.top_k` from config.
pub async fn answer(config: &Config, query: &str, k_override: Option<usize>) -> Result<QueryResponse> {
    let embedder = RemoteEmbedder::new(&config.provider)?;
    let completer = RemoteCompleter::new(&config.provider)?;
    answer_with(config, &embedder, &completer, query, k_override).await
}

/// Answer a question with explicitly injected provider implementations.
///
/// This is the seam tests use to drive the full pipeline on stubs.
pub async fn answer_with(
    config: &Config,
    embedder: &dyn Embedder,
    completer: &dyn Completer,
    query: &str,
    k_override: Option<usize>,
) -> Result<QueryResponse> {
    let store = IndexStore::from_config(config);
    let (index, mapping) = store.load_or_build(embedder).await?;

    let k = k_override.unwrap_or(config.retrieval.top_k);
    let retrieved_chunks = retrieve_chunks(embedder, query, &index, &mapping, k).await?;

    let prompt = build_prompt(&retrieved_chunks, query);
    let answer = completer.complete(&prompt).await?;

    Ok(QueryResponse {
        answer,
        retrieved_chunks,
    })
}
