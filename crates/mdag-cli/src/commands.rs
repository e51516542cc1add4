use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use mdag_dag::{Link, MerkleDag};
use mdag_store::{BlockService, FsBlockStore};
use mdag_types::Cid;
use mdag_unixfs::ImportConfig;

use crate::cli::*;

/// Payload bytes shown by `dag-get` in text mode.
const PREVIEW_LEN: usize = 32;

pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match cli.command {
        Command::Add(ref args) => cmd_add(&cli, args, out),
        Command::Cat(ref args) => cmd_cat(&cli.repo, args, out),
        Command::Get(ref args) => cmd_get(&cli, args, out),
        Command::DagGet(ref args) => cmd_dag_get(&cli, args, out),
    }
}

fn open_repo(repo: &Path, sync: bool) -> anyhow::Result<MerkleDag> {
    let store = FsBlockStore::open(repo.join("blocks"))
        .with_context(|| format!("cannot open repository at {}", repo.display()))?
        .with_sync(sync);
    debug!(repo = %repo.display(), sync, "opened repository");
    Ok(MerkleDag::new(BlockService::new(Arc::new(store))))
}

/// Like [`open_repo`], but refuses to create a repository that isn't there.
fn open_existing_repo(repo: &Path) -> anyhow::Result<MerkleDag> {
    if !repo.is_dir() {
        anyhow::bail!("no repository at {} (run `mdag add` first)", repo.display());
    }
    open_repo(repo, false)
}

fn parse_cid(text: &str) -> anyhow::Result<Cid> {
    text.parse::<Cid>()
        .with_context(|| format!("invalid identifier {text:?}"))
}

#[derive(Serialize)]
struct AddOutput<'a> {
    cid: Cid,
    size: u64,
    path: &'a Path,
}

fn cmd_add(cli: &Cli, args: &AddArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => ImportConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ImportConfig::default(),
    };
    let config = args.import_config(base)?;
    let dag = open_repo(&cli.repo, args.sync)?;

    let root = mdag_unixfs::import_file(&dag, &args.path, &config)
        .with_context(|| format!("cannot add {}", args.path.display()))?;

    match cli.format {
        OutputFormat::Json => {
            let record = AddOutput {
                cid: root.cid(),
                size: root.total_size(),
                path: &args.path,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "{} added {} {} ({} bytes)",
                "✓".green().bold(),
                root.cid().to_string().yellow(),
                args.path.display(),
                root.total_size()
            )?;
        }
    }
    Ok(())
}

fn cmd_cat(repo: &Path, args: &CatArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let cid = parse_cid(&args.cid)?;
    let dag = open_existing_repo(repo)?;
    let mut sink = BufWriter::new(out);
    mdag_unixfs::export(&dag, &cid, &mut sink).with_context(|| format!("cannot read {cid}"))?;
    sink.flush()?;
    Ok(())
}

fn cmd_get(cli: &Cli, args: &GetArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let dag = open_existing_repo(&cli.repo)?;
    let written = mdag_unixfs::export_to_file(&dag, &args.cid, &args.output)
        .with_context(|| format!("cannot export {} to {}", args.cid, args.output.display()))?;
    if cli.format == OutputFormat::Text {
        writeln!(
            out,
            "{} wrote {} bytes to {}",
            "✓".green().bold(),
            written,
            args.output.display()
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct NodeOutput<'a> {
    cid: Cid,
    data_size: usize,
    total_size: u64,
    block_size: usize,
    links: &'a [Link],
}

fn cmd_dag_get(cli: &Cli, args: &DagGetArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let cid = parse_cid(&args.cid)?;
    let dag = open_existing_repo(&cli.repo)?;
    let node = mdag_unixfs::dag_get(&dag, &cid).with_context(|| format!("cannot load node {cid}"))?;

    if cli.format == OutputFormat::Json {
        let record = NodeOutput {
            cid: node.cid(),
            data_size: node.data().len(),
            total_size: node.total_size(),
            block_size: node.block_size(),
            links: node.links(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
        return Ok(());
    }

    writeln!(out, "{} {}", "node".bold(), node.cid().to_string().yellow())?;
    writeln!(out, "  block:   {} bytes", node.block_size())?;
    writeln!(out, "  payload: {} bytes", node.data().len())?;
    if !node.data().is_empty() {
        let shown = node.data().len().min(PREVIEW_LEN);
        let ellipsis = if shown < node.data().len() { "…" } else { "" };
        writeln!(out, "           {}{}", hex::encode(&node.data()[..shown]).dimmed(), ellipsis)?;
    }
    writeln!(out, "  total:   {} bytes", node.total_size())?;
    writeln!(out, "  links:   {}", node.links().len())?;
    for (i, link) in node.links().iter().enumerate() {
        let name = if link.name.is_empty() { String::new() } else { format!(" {}", link.name.cyan()) };
        writeln!(out, "    {:>4}  {}  {} bytes{}", i, link.cid.to_string().yellow(), link.size, name)?;
    }
    Ok(())
}
