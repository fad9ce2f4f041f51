use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use lawbot_cli::{init_tracing, load_settings};
use lawbot_core::config::expand_path;
use lawbot_core::data_processor::{ChunkingConfig, DataProcessor};
use lawbot_embed::default_embedder;
use lawbot_vector::IndexBuilder;

#[derive(Parser)]
#[command(name = "lawbot-indexer", version, about = "Build the LawBot vectorstore from legal Q&A datasets")]
struct Args {
    /// Corpus directory (default: corpus.data_dir)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Output vectorstore directory (default: rag.vectorstore_dir)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Read at most this many corpus files
    #[arg(long)]
    limit: Option<usize>,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let settings = load_settings()?;

    let data_dir = args.data.unwrap_or_else(|| expand_path(&settings.corpus.data_dir));
    let out_dir = args.out.unwrap_or_else(|| expand_path(&settings.rag.vectorstore_dir));

    let processor = DataProcessor::with_config(ChunkingConfig::from(&settings.corpus));
    let chunks = match args.limit {
        Some(limit) => processor.process_directory_limited(&data_dir, limit)?,
        None => processor.process_directory(&data_dir)?,
    };
    if chunks.is_empty() {
        bail!("no corpus chunks found under {}", data_dir.display());
    }

    let embedder = default_embedder(&settings.embedding)?;
    let manifest = IndexBuilder::new(embedder.as_ref())
        .batch_size(settings.corpus.batch_size)
        .show_progress(true)
        .build_and_save(&chunks, &out_dir)?;

    println!("Indexed {} chunks ({} dims, {}) into {}", manifest.count, manifest.dim, manifest.embedder_id, out_dir.display());
    println!("Ask a question with: lawbot ask \"What is bail?\"");
    Ok(())
}
