//! Perft runner - counts move-tree leaves for chess positions.
//!
//! `perft divide <FEN> <DEPTH>` prints the node count below every root
//! move, and `perft suite <PATH>` checks a TOML file of reference counts.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use chess_movegen::{perft_divide_parallel, Position};
use clap::{Parser, Subcommand};
use perft_cli::{render_divide, OutputFormat, PerftSuite};
use tracing::Level;

/// Perft - validates the move generator by counting leaf nodes.
#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Counts move-tree leaves for chess positions")]
struct Args {
    /// Log progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the node count below each root move
    Divide {
        /// Position in FEN (4 or 6 fields)
        fen: String,

        /// Depth in plies
        depth: u32,

        /// Worker threads splitting the root moves
        #[arg(long, default_value = "1")]
        threads: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run every case of a TOML perft suite
    Suite {
        /// Path to the suite file
        path: PathBuf,

        /// Worker threads splitting the root moves
        #[arg(long, default_value = "1")]
        threads: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match args.command {
        Command::Divide {
            fen,
            depth,
            threads,
            format,
        } => {
            let position =
                Position::from_fen(&fen).with_context(|| format!("invalid FEN: {fen}"))?;
            let started = Instant::now();
            let divide = perft_divide_parallel(&position, depth, threads);
            tracing::info!(
                depth,
                threads,
                nodes = divide.total,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "perft finished"
            );
            print!("{}", render_divide(&divide, format)?);
        }
        Command::Suite { path, threads } => {
            let suite = PerftSuite::load(&path)
                .with_context(|| format!("failed to load suite {}", path.display()))?;
            let outcomes = suite.run(threads)?;

            for outcome in &outcomes {
                let status = if outcome.passed() { "ok" } else { "FAILED" };
                println!(
                    "{status:6} {} (depth {}): expected {}, got {} in {:.2?}",
                    outcome.name, outcome.depth, outcome.expected, outcome.actual, outcome.elapsed
                );
            }

            let failed = outcomes.iter().filter(|o| !o.passed()).count();
            if failed > 0 {
                bail!("{failed} of {} cases failed", outcomes.len());
            }
            println!("all {} cases passed", outcomes.len());
        }
    }

    Ok(())
}
