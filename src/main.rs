//! OEM Resolver batch binary
//!
//! Reads a JSON batch (one query object or `{"queries": [...]}`) from a
//! file or stdin, resolves each query against a replay session, and writes
//! one result per query as a JSON array on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oem_resolver::{parse_batch, OemResolver, ReplaySession, Vocabulary};

#[derive(Debug, Parser)]
#[command(name = "oem-resolver", about = "Resolve vehicle-part queries to OEM part numbers")]
struct Args {
    /// Input batch JSON file; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory of captured page snapshots served to providers.
    #[arg(long, default_value = "snapshots")]
    snapshots: PathBuf,

    /// Vocabulary YAML overriding the compiled-in tables.
    #[arg(long)]
    vocabulary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oem_resolver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let raw_input = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read input from stdin")?;
            buf
        }
    };

    // Shape validation is fatal for the batch, before any provider work.
    let batch = parse_batch(&raw_input)?;

    let vocab = match &args.vocabulary {
        Some(path) => Vocabulary::from_file(path)
            .with_context(|| format!("failed to load vocabulary {}", path.display()))?,
        None => Vocabulary::builtin(),
    };

    tracing::info!(snapshots = %args.snapshots.display(), "starting batch resolution");

    let resolver = OemResolver::with_default_providers(Arc::new(vocab));
    let session = ReplaySession::new(&args.snapshots);

    let outputs = resolver.resolve_batch(batch, &session).await;

    tracing::info!(queries = outputs.len(), "batch resolution complete");

    let rendered = serde_json::to_string_pretty(&outputs)?;
    println!("{rendered}");

    Ok(())
}
