//! brawlsim - Two-Fighter Arena Brawler
//!
//! Runs a bout headlessly and prints the result. See `--help` for options.

use std::process::ExitCode;

use brawlsim::cli;
use brawlsim::headless::{run_headless_match, MatchResult};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let config = match args.to_headless_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_headless_match(&config, Some(&args.log_filter)) {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(result: &MatchResult) {
    let verdict = match result.winner {
        Some(side) => format!("{} side wins", side.name()),
        None if result.timed_out => "Draw (time limit reached)".to_string(),
        None => "Draw".to_string(),
    };
    println!(
        "{} | rounds {} - {} | {:.1}s",
        verdict, result.left_wins, result.right_wins, result.match_time
    );

    for (label, fighter) in [("Left", &result.left), ("Right", &result.right)] {
        println!(
            "  {:<5} {:<10} {:>6.1}/{:<6.1} dealt {:>6.1} taken {:>6.1} best combo {}",
            label,
            fighter.fighter_name,
            fighter.final_health,
            fighter.max_health,
            fighter.damage_dealt,
            fighter.damage_taken,
            fighter.max_combo
        );
    }
    if let Some(seed) = result.random_seed {
        println!("  seed {}", seed);
    }
    println!("Log saved to: {}", result.log_path.display());
}
