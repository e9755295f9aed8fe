use clap::Parser;
use std::path::PathBuf;
use tidytree::cli::{SortCommand, run_cli};

/// Recursively sort a directory tree into category folders by file extension.
#[derive(Parser)]
#[command(name = "tidytree", version)]
struct Args {
    /// Directory tree to sort
    path: PathBuf,

    /// Simulate the run without moving any files
    #[arg(long)]
    dry_run: bool,

    /// Revert the previous sorting run
    #[arg(long, conflicts_with = "dry_run")]
    undo: bool,
}

fn main() {
    let args = Args::parse();

    let command = if args.undo {
        SortCommand::Undo
    } else {
        SortCommand::Sort {
            dry_run: args.dry_run,
        }
    };

    if let Err(e) = run_cli(command, &args.path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
