//! # docrag CLI
//!
//! The `docrag` binary drives the RAG pipeline: building the persisted
//! vector index, answering one-shot questions in the terminal, and
//! starting the HTTP query server.
//!
//! ## Usage
//!
//! ```bash
//! docrag --config ./config/docrag.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docrag build` | Build (or load) the vector index from the corpus |
//! | `docrag query "<text>"` | Answer a question with retrieved context |
//! | `docrag serve` | Start the HTTP query server |
//!
//! ## Examples
//!
//! ```bash
//! # Build the index, discarding any existing artifacts first
//! docrag build --force --config ./config/docrag.toml
//!
//! # Ask with a wider retrieval window
//! docrag query "how is deployment rolled back?" --k 5
//!
//! # Serve POST /query on the configured bind address
//! docrag serve --config ./config/docrag.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docrag::config;
use docrag::embedding::RemoteEmbedder;
use docrag::query;
use docrag::server;
use docrag::store::IndexStore;

/// docrag CLI — a single-corpus retrieval-augmented generation query
/// service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/docrag.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "docrag",
    about = "docrag — a single-corpus retrieval-augmented generation query service",
    version,
    long_about = "docrag chunks a local document, embeds the chunks through a remote provider, \
    maintains a persisted flat L2 vector index, and answers questions by retrieving the top-k \
    nearest chunks and prompting a remote completion model."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/docrag.toml`. Corpus, store, provider, and
    /// server settings are read from this file.
    #[arg(long, global = true, default_value = "./config/docrag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the vector index from the corpus document.
    ///
    /// Loads the persisted artifact when a valid one exists; otherwise
    /// chunks the document, embeds every chunk, and persists the index
    /// and chunk mapping. One remote call per chunk on a full rebuild.
    Build {
        /// Discard any existing artifacts and rebuild from scratch.
        #[arg(long)]
        force: bool,
    },

    /// Answer a question in the terminal.
    ///
    /// Loads (or rebuilds) the index, retrieves the nearest chunks, and
    /// prints the generated answer followed by the retrieved context.
    Query {
        /// The question to answer.
        query: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k).
        #[arg(long)]
        k: Option<usize>,
    },

    /// Start the HTTP query server.
    ///
    /// Serves `POST /query` on the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build { force } => {
            let embedder = RemoteEmbedder::new(&cfg.provider)?;
            let store = IndexStore::from_config(&cfg);
            if force {
                store.clear()?;
            }
            let (index, mapping) = store.load_or_build(&embedder).await?;
            println!("index ready: {} entries", index.ntotal());
            println!("corpus chunks: {}", mapping.len());
        }
        Commands::Query { query, k } => {
            let response = query::answer(&cfg, &query, k).await?;

            println!("{}", response.answer.trim());
            println!();
            println!("retrieved context:");
            for (i, chunk) in response.retrieved_chunks.iter().enumerate() {
                println!("{}. \"{}\"", i + 1, chunk.replace('\n', " "));
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
