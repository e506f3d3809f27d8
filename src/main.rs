use anyhow::{Context, Result};
use clap::Parser;
use skilltree::parser::{BracePolicy, SkillTreeParser};
use std::path::PathBuf;
use tracing::{error, info};

/// Parse a skill tree file, propagate labels, and print the tree.
#[derive(Parser)]
#[command(name = "skilltree", version)]
struct Cli {
    /// Skill tree file to read
    file: PathBuf,

    /// Tolerate unbalanced braces instead of rejecting the file
    #[arg(long)]
    permissive: bool,

    /// Print the tree as parsed, without propagating labels
    #[arg(long)]
    no_propagate: bool,
}

fn main() {
    skilltree::init_tracing();

    if let Err(err) = run(Cli::parse()) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let brace_policy = if cli.permissive {
        BracePolicy::Permissive
    } else {
        BracePolicy::Strict
    };

    let mut tree = SkillTreeParser::new()
        .with_brace_policy(brace_policy)
        .parse_file(&cli.file)
        .with_context(|| format!("failed to parse {}", cli.file.display()))?;
    info!(nodes = tree.num_nodes(), leaves = tree.num_leaves(), "loaded skill tree");

    if !cli.no_propagate {
        tree.assign_labels().context("failed to assign labels")?;
    }

    tree.print_tree();
    Ok(())
}
