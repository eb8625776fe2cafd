//! # docrag
//!
//! A single-corpus retrieval-augmented generation query service.
//!
//! docrag chunks one local document, embeds the chunks through a remote
//! provider, keeps an exact flat L2 index plus a parallel chunk-text
//! mapping persisted on disk, and answers questions by retrieving the
//! top-k nearest chunks and prompting a remote completion model with them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────┐
//! │ Document │──▶│ Chunk + Embed │──▶│ Flat L2     │
//! │ (corpus) │   │  (remote API) │   │ index+map   │
//! └──────────┘   └──────────────┘   └──────┬──────┘
//!                                          │
//!                       query ──▶ retrieve top-k
//!                                          │
//!                               prompt ──▶ complete ──▶ answer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docrag build                 # build (or load) the vector index
//! docrag query "what is X?"    # one-shot answer in the terminal
//! docrag serve                 # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Typed error taxonomy |
//! | [`chunk`] | Word-window chunking |
//! | [`embedding`] | Embedding client abstraction |
//! | [`completion`] | Completion client abstraction |
//! | [`index`] | Exact flat L2 vector index |
//! | [`store`] | Persisted index store (load / validate / rebuild) |
//! | [`retrieve`] | Top-k chunk retrieval |
//! | [`prompt`] | Prompt assembly |
//! | [`query`] | End-to-end answer orchestration |
//! | [`server`] | HTTP query server |

pub mod chunk;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod prompt;
pub mod query;
pub mod retrieve;
pub mod server;
pub mod store;
