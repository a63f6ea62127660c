//! Replay command - rebuild and print a position from a saved record

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexhive_core::{Color, GameRecord, GameState, Move};

#[derive(Args)]
pub struct ReplayArgs {
    /// Game record JSON file
    pub file: PathBuf,

    /// Stop after this many moves (default: the whole game)
    #[arg(long)]
    pub upto: Option<usize>,

    /// Print the board after every move
    #[arg(long)]
    pub verbose: bool,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let record = GameRecord::load(&args.file)?;
    let upto = args.upto.unwrap_or(record.len()).min(record.len());

    tracing::info!(
        "Replaying {} ({} rules, {} of {} moves)",
        args.file.display(),
        record.rules.name,
        upto,
        record.len()
    );

    let states = record
        .replay()
        .with_context(|| format!("Record {} does not replay", args.file.display()))?;

    if args.verbose {
        for (i, mv) in record.moves.iter().take(upto).enumerate() {
            println!("{:>3}. {}", i + 1, describe(mv));
            println!("{}", states[i + 1].board());
        }
    }

    print_position(&states[upto]);
    Ok(())
}

fn describe(mv: &Move) -> String {
    match *mv {
        Move::Place { piece, to } => format!("{} enters at {}", piece, to),
        Move::Move { piece, to, .. } => format!("{} to {}", piece, to),
        Move::Throw { by, piece, to } => format!("{} throws {} to {}", by, piece, to),
        Move::Pass => "pass".to_string(),
    }
}

fn print_position(state: &GameState) {
    println!("{}", state.board());
    println!("Turn:    {}", state.turn());
    println!("To move: {:?}", state.current_player());
    println!("Result:  {:?}", state.result());
    for color in [Color::White, Color::Black] {
        let hand: Vec<String> = state.hand(color).iter().map(|p| p.id()).collect();
        println!("{:?} hand: {}", color, hand.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexhive_core::Hex;

    #[test]
    fn test_describe() {
        let mv = Move::Throw {
            by: "wP".parse().unwrap(),
            piece: "bA2".parse().unwrap(),
            to: Hex::new(1, -1),
        };
        assert_eq!(describe(&mv), "wP throws bA2 to (1, -1)");
        assert_eq!(describe(&Move::Pass), "pass");
    }
}
