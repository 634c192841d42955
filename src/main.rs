//! csmt CLI - build a tree from a batch file and query it
//!
//! Every invocation builds the tree in memory from a JSON batch of
//! `{"id": [u8, ...], "value": ...}` entries; nothing is persisted.

use anyhow::Context;
use clap::{Parser, Subcommand};
use csmt::{Blake3Hasher, Csmt, HasherKind, Key, Node, Proof, Sha256Hasher, TreeConfig, TreeHasher};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csmt")]
#[command(about = "A compact sparse Merkle tree with membership and non-membership proofs")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/csmt/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hash function, overriding the config (sha256 or blake3)
    #[arg(long)]
    hasher: Option<HasherKind>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Log tree operations to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root of the tree built from a batch
    Root {
        /// Batch file
        batch: PathBuf,
    },

    /// Look up the value digest of a key
    Get {
        /// Batch file
        batch: PathBuf,
        /// The key, hex encoded
        key: String,
    },

    /// Create a membership or non-membership proof for a key
    Prove {
        /// Batch file
        batch: PathBuf,
        /// The key, hex encoded
        key: String,
    },

    /// Verify a proof produced by `prove`
    Verify {
        /// Proof file
        proof: PathBuf,
    },

    /// List every stored node
    Dump {
        /// Batch file
        batch: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = TreeConfig::load_or_default(cli.config.as_deref())?;
    if let Some(hasher) = cli.hasher {
        config.hasher = hasher;
    }

    match config.hasher {
        HasherKind::Sha256 => run::<Sha256Hasher>(&cli, config),
        HasherKind::Blake3 => run::<Blake3Hasher>(&cli, config),
    }
}

fn run<H: TreeHasher>(cli: &Cli, config: TreeConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Root { batch } => {
            let tree = build_tree::<H>(batch, config)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "root": tree.root(),
                    "keys": tree.len(),
                    "nodes": tree.node_count()
                }),
            )?;
        }

        Commands::Get { batch, key } => {
            let tree = build_tree::<H>(batch, config)?;
            let key = parse_key(key)?;
            match tree.get(key.clone())? {
                Some(value) => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "key": key,
                            "value": value
                        }),
                    )?;
                }
                None => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "error",
                            "message": format!("Key not found: {}", key)
                        }),
                    )?;
                    std::process::exit(1);
                }
            }
        }

        Commands::Prove { batch, key } => {
            let tree = build_tree::<H>(batch, config)?;
            let proof = tree.create_proof(parse_key(key)?)?;
            output(&cli.format, &serde_json::to_value(&proof)?)?;
        }

        Commands::Verify { proof } => {
            let content = std::fs::read_to_string(proof)
                .with_context(|| format!("Failed to read proof {}", proof.display()))?;
            let proof: Proof = serde_json::from_str(&content)?;
            let valid = csmt::verify_proof::<H>(&proof);
            output(
                &cli.format,
                &serde_json::json!({
                    "valid": valid,
                    "membership": proof.membership,
                    "key": proof.entry.key
                }),
            )?;
            if !valid {
                std::process::exit(1);
            }
        }

        Commands::Dump { batch } => {
            let tree = build_tree::<H>(batch, config)?;
            let items: Vec<_> = tree
                .nodes()
                .map(|(hash, node)| match node {
                    Node::Leaf(leaf) => serde_json::json!({
                        "hash": hash,
                        "kind": "leaf",
                        "key": leaf.key,
                        "value": leaf.value
                    }),
                    Node::Internal(internal) => serde_json::json!({
                        "hash": hash,
                        "kind": "internal",
                        "left": internal.left,
                        "right": internal.right
                    }),
                })
                .collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "root": tree.root(),
                    "count": items.len(),
                    "nodes": items
                }),
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "csmt=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_tree<H: TreeHasher>(batch: &Path, config: TreeConfig) -> anyhow::Result<Csmt<H>> {
    let content = std::fs::read_to_string(batch)
        .with_context(|| format!("Failed to read batch {}", batch.display()))?;
    let entries: serde_json::Value = serde_json::from_str(&content)?;
    let mut tree = Csmt::<H>::with_config(config);
    tree.insert_json(&entries)?;
    Ok(tree)
}

fn parse_key(key: &str) -> anyhow::Result<Key> {
    Key::from_hex(key).map_err(|_| anyhow::anyhow!("Invalid key (expected hex): {}", key))
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
