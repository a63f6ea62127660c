//! Selfplay command - seeded random games with invariant checks
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), verify_record(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexhive_core::{play_random_game, GameRecord, GameResult, Rules};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Maximum plies per game
    #[arg(long, default_value = "200")]
    pub max_turns: u32,

    /// Rules JSON file or preset name
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Write each game record into this directory
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    seed: u64,
    result: GameResult,
    plies: usize,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct SelfplayResults {
    games: Vec<GameSummary>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Load rules
/// 2. Play and verify every game
/// 3. Report results
pub fn run(args: SelfplayArgs) -> Result<()> {
    let rules = crate::load_rules(args.rules.as_deref())?;
    let last = game_seed(args.seed, (args.games as u64).saturating_sub(1))?;

    tracing::info!(
        "Starting selfplay: {} games, {} rules, seeds {}..={}",
        args.games,
        rules.name,
        args.seed,
        last
    );

    let results = play_games(&rules, &args)?;
    report_results(&results, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(rules: &Rules, args: &SelfplayArgs) -> Result<SelfplayResults> {
    if let Some(dir) = &args.save_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut games = Vec::with_capacity(args.games);
    for i in 0..args.games as u64 {
        let seed = game_seed(args.seed, i)?;
        let (summary, record) = play_single_game(rules, seed, args.max_turns)?;

        tracing::info!("Game seed {}: {:?} ({} plies)", seed, summary.result, summary.plies);

        if let Some(dir) = &args.save_dir {
            record.save(&record_path(dir, seed))?;
        }
        games.push(summary);
    }

    Ok(compute_statistics(games))
}

fn report_results(results: &SelfplayResults, json: bool) {
    if json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(rules: &Rules, seed: u64, max_turns: u32) -> Result<(GameSummary, GameRecord)> {
    let (state, record) = play_random_game(rules.clone(), seed, max_turns);
    verify_record(&record).with_context(|| format!("Game with seed {} broke an invariant", seed))?;

    let summary = GameSummary {
        seed,
        result: state.result(),
        plies: record.len(),
    };
    Ok((summary, record))
}

/// Replay a record, checking the one-hive rule after every ply
fn verify_record(record: &GameRecord) -> Result<()> {
    let states = record.replay()?;
    for (ply, state) in states.iter().enumerate() {
        if !state.board().is_connected() {
            anyhow::bail!("hive split after ply {}:\n{}", ply, state.board());
        }
    }
    Ok(())
}

fn compute_statistics(games: Vec<GameSummary>) -> SelfplayResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let white_wins = count(GameResult::WhiteWins);
    let black_wins = count(GameResult::BlackWins);
    let draws = count(GameResult::Draw);
    let unfinished = count(GameResult::Ongoing);

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    SelfplayResults {
        games,
        white_wins,
        black_wins,
        draws,
        unfinished,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn game_seed(base: u64, index: u64) -> Result<u64> {
    base.checked_add(index)
        .with_context(|| format!("Seed {} + {} does not fit in u64", base, index))
}

fn record_path(dir: &Path, seed: u64) -> PathBuf {
    dir.join(format!("game-{:05}.json", seed))
}

fn percent(n: usize, total: usize) -> f32 {
    if total > 0 {
        n as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &SelfplayResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        seed: u64,
        result: GameResult,
        plies: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame { seed: g.seed, result: g.result, plies: g.plies })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &SelfplayResults) {
    let total = results.games.len();

    println!("\n=== Selfplay Results ===");
    println!("Total games: {}", total);
    println!("White wins:  {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Black wins:  {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Unfinished:  {} ({:.1}%)", results.unfinished, percent(results.unfinished, total));
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!("  Seed {}: {:?} in {} plies", game.seed, game.result, game.plies);
    }
}

// ============================================================================
// TESTS
// ============================================================================
