use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use mdag_crypto::HashFunction;
use mdag_unixfs::{ImportConfig, Layout, DEFAULT_MAX_LINKS};

#[derive(Parser)]
#[command(
    name = "mdag",
    about = "mdag: content-addressed file storage over a merkle DAG",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository directory
    #[arg(long, global = true, env = "MDAG_REPO", default_value = ".mdag")]
    pub repo: PathBuf,

    /// Import settings file (TOML); flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a file and print its root identifier
    Add(AddArgs),
    /// Write the content under an identifier to stdout
    Cat(CatArgs),
    /// Write the content under an identifier to a file
    Get(GetArgs),
    /// Show a single node: payload size and links
    DagGet(DagGetArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// File to import
    pub path: PathBuf,

    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// sha2-256 or blake3
    #[arg(long)]
    pub hash: Option<HashFunction>,

    #[arg(long)]
    pub layout: Option<LayoutKind>,

    /// Fan-out of balanced index nodes; implies --layout balanced
    #[arg(long)]
    pub max_links: Option<usize>,

    /// fsync every block before it is committed
    #[arg(long)]
    pub sync: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutKind {
    Flat,
    Balanced,
}

#[derive(Args)]
pub struct CatArgs {
    pub cid: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub cid: String,
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct DagGetArgs {
    pub cid: String,
}

impl AddArgs {
    /// Apply the command-line overrides on top of `base`.
    pub fn import_config(&self, base: ImportConfig) -> anyhow::Result<ImportConfig> {
        let mut config = base;
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(hash) = self.hash {
            config.hash = hash;
        }

        let current_fanout = match config.layout {
            Layout::Balanced { max_links } => max_links,
            Layout::Flat => DEFAULT_MAX_LINKS,
        };
        config.layout = match (self.layout, self.max_links) {
            (Some(LayoutKind::Flat), Some(_)) => bail!("--max-links only applies to the balanced layout"),
            (Some(LayoutKind::Flat), None) => Layout::Flat,
            (Some(LayoutKind::Balanced), max_links) => Layout::Balanced {
                max_links: max_links.unwrap_or(current_fanout),
            },
            (None, Some(max_links)) => Layout::Balanced { max_links },
            (None, None) => config.layout,
        };

        config.validate()?;
        Ok(config)
    }
}
