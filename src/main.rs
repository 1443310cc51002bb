mod app;
mod catalog;
mod command;
mod config;
mod constants;
mod error;
mod logging;
mod output;
mod player;
mod playlist;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::info;

use app::App;
use catalog::VideoCatalog;
use config::Config;
use output::Stdout;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Catalog file with one `Title | id | #tag , #tag` line per video (default: built-in catalog)
  #[arg(short, long)]
  catalog: Option<PathBuf>,

  /// Seed for PLAY_RANDOM, for repeatable sessions
  #[arg(long)]
  seed: Option<u64>,

  /// Print a shell completion script and exit
  #[arg(long, value_enum)]
  completions: Option<Shell>,
}

// --- Main ---

fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), env!("CARGO_PKG_NAME"), &mut std::io::stdout());
    return Ok(());
  }

  let config = Config::load();
  let _log_guard = logging::init(config.log_filter.as_deref());

  let catalog = match args.catalog.or_else(|| config.catalog_path()) {
    Some(path) => VideoCatalog::load(&path)?,
    None => VideoCatalog::builtin()?,
  };
  info!(videos = catalog.len(), seed = ?args.seed, "session: catalog loaded");

  let mut app = App::new(catalog, args.seed);
  app.run(&mut std::io::stdin().lock(), &mut Stdout).context("Session failed")
}
