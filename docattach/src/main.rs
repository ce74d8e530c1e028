//! docattach — attach XML documentation comments to a decompiled declaration tree.
//!
//! Reads a declaration tree (JSON), looks up every declaration's member key in
//! its module's XML documentation file and writes the tree back out with
//! `///` comments in front of each documented declaration.
//!
//! - `docattach tree.json -d ref/`      read a file, print a text outline
//! - `docattach -f json < tree.json`    read stdin, print the tree as JSON
//!
//! Documentation files are found next to each module (`Acme.Core.dll` →
//! `Acme.Core.xml`) and then in every `--docs` directory, in order.

mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use xmldoc::{DocCache, DocLoader};

#[derive(Parser)]
#[command(
    name = "docattach",
    about = "Attach XML documentation comments to a decompiled declaration tree"
)]
struct Cli {
    /// Tree file (JSON). If omitted, reads from stdin.
    tree: Option<PathBuf>,

    /// Directory searched for <module>.xml documentation files.
    /// Repeatable; glob patterns supported.
    #[arg(short = 'd', long = "docs")]
    docs: Vec<String>,

    /// Output format: text (default), json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Output file. If omitted, writes to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log every attached declaration (RUST_LOG overrides)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Fail on a bad format before doing any work
    let renderer = render::create_renderer(&cli.format)?;

    let source = read_input(cli.tree.as_deref())?;
    let spec: input::NodeSpec =
        serde_json::from_str(&source).context("failed to parse declaration tree")?;
    let mut tree = input::build_tree(&spec)?;

    let mut loader = DocLoader::new();
    for dir in expand_dirs(&cli.docs)? {
        loader = loader.with_search_dir(dir);
    }
    let cache = DocCache::new(loader);

    let root = tree.root();
    let report = xmldoc::attach(&cache, &mut tree, root);
    info!(
        visited = report.visited,
        documented = report.documented,
        comments = report.comments,
        modules = cache.len(),
        "attached documentation"
    );

    let output = renderer.render(&tree)?;
    match cli.output {
        Some(path) => fs::write(&path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read the tree from a file, or from stdin when no file is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Expand `--docs` arguments into existing directories.
/// Plain directories are taken as-is; anything else is tried as a glob.
fn expand_dirs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            dirs.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_dir())
            .collect();
        if matches.is_empty() {
            warn!("no documentation directories matched: {}", pattern);
        }
        dirs.extend(matches);
    }
    // Keep command-line order, drop repeats
    let mut seen = std::collections::HashSet::new();
    dirs.retain(|d| seen.insert(d.clone()));
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_directory_is_kept() {
        let dir = TempDir::new().unwrap();
        let arg = dir.path().to_string_lossy().to_string();
        assert_eq!(expand_dirs(&[arg]).unwrap(), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn glob_matches_directories_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("net8")).unwrap();
        fs::create_dir(dir.path().join("net6")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let pattern = format!("{}/*", dir.path().display());
        let mut got = expand_dirs(&[pattern]).unwrap();
        got.sort();
        assert_eq!(got, vec![dir.path().join("net6"), dir.path().join("net8")]);
    }

    #[test]
    fn repeats_are_dropped_in_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let a_arg = a.path().to_string_lossy().to_string();
        let b_arg = b.path().to_string_lossy().to_string();
        let got = expand_dirs(&[b_arg.clone(), a_arg, b_arg]).unwrap();
        assert_eq!(got, vec![b.path().to_path_buf(), a.path().to_path_buf()]);
    }

    #[test]
    fn unmatched_pattern_is_not_an_error() {
        assert!(expand_dirs(&["/nonexistent/*/docs".to_string()]).unwrap().is_empty());
    }

    #[test]
    fn invalid_glob_is_an_error() {
        assert!(expand_dirs(&["[".to_string()]).is_err());
    }
}
