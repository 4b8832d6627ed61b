#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads saved scenarios and replays turns.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use wildgrid_core::Command;
use wildgrid_world::{apply, query, Session};

/// Loads one or more scenario saves, advances the current scenario by a
/// number of turns, and prints the event log and statistics.
#[derive(Debug, Parser)]
#[command(name = "wildgrid", about = "Replay saved wild-grid scenarios")]
struct Args {
    /// Scenario save files to load; the last one becomes current.
    #[arg(required = true)]
    saves: Vec<PathBuf>,

    /// Number of turns to simulate on the current scenario.
    #[arg(long, default_value_t = 0)]
    turns: u32,
}

/// Entry point for the wild-grid command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let mut session = Session::new();

    for path in &args.saves {
        let file =
            File::open(path).with_context(|| format!("cannot open save {}", path.display()))?;
        session
            .load(BufReader::new(file))
            .with_context(|| format!("cannot load save {}", path.display()))?;
        let scenario = session
            .current()
            .context("no scenario became current after load")?;
        println!("{}", query::summary(scenario));
    }

    let scenario = session.current_mut().context("no scenario loaded")?;
    for _ in 0..args.turns {
        apply(scenario, Command::EndTurn).context("turn failed")?;
    }

    let log = query::log_text(scenario);
    if !log.is_empty() {
        println!("{log}");
    }
    println!("{}", query::stats(scenario));
    Ok(())
}
