use clap::Parser;
use creature_battler::battle::ai::AiTier;
use creature_battler::battle::runner::BattleRunner;
use creature_battler::config::BattleConfig;
use creature_battler::roster::{draft_bot_team, RonRosterSource, RosterSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEMO_ROSTER: &str = include_str!("../data/demo_roster.ron");
const TEAM_SIZE: usize = 3;
const DEFAULT_SEED: u64 = 42;
/// Safety valve for the demo loop.
const MAX_ROUNDS: u32 = 500;
/// Env var holding the diagnostic filter, e.g. `creature_battler=debug`.
const LOG_ENV: &str = "CREATURE_BATTLER_LOG";

/// Runs a seeded AI-vs-AI battle from the bundled roster.
#[derive(Parser)]
#[command(name = "creature-battler")]
#[command(about = "Seeded AI-vs-AI creature battle", long_about = None)]
#[command(version)]
struct Cli {
    /// Print the event stream and report as JSON instead of log lines
    #[arg(long)]
    json: bool,

    /// Seed for team drafting and battle randomness
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Opponent AI tier (random/easy, greedy/normal, tactical/hard)
    #[arg(long, default_value = "normal", value_parser = AiTier::from_str)]
    tier: AiTier,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var(LOG_ENV)
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse();

    let templates = match RonRosterSource::from_ron_str(DEMO_ROSTER).load_templates() {
        Ok(templates) => templates,
        Err(e) => {
            println!("Error loading roster: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Both teams are bot drafts so the whole run follows from one seed.
    let mut draft_rng = StdRng::seed_from_u64(options.seed);
    let teams = draft_bot_team(&templates, TEAM_SIZE, &mut draft_rng).and_then(|player| {
        draft_bot_team(&templates, TEAM_SIZE, &mut draft_rng).map(|opponent| (player, opponent))
    });
    let (player_team, opponent_team) = match teams {
        Ok(teams) => teams,
        Err(e) => {
            println!("Error drafting teams: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = BattleConfig::default()
        .with_tier(options.tier)
        .with_seed(options.seed);
    let mut runner = match BattleRunner::new(
        format!("demo-{}", options.seed),
        player_team,
        opponent_team,
        config,
    ) {
        Ok(runner) => runner,
        Err(e) => {
            println!("Error starting battle: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !options.json {
        let info = runner.battle_info();
        println!("=== Battle {} ({} difficulty) ===", info.battle_id, info.difficulty);
        for side in &info.sides {
            let names: Vec<&str> = side.team.iter().map(|c| c.name.as_str()).collect();
            println!("{}: {}", side.side.label(), names.join(", "));
        }
        println!();
    }

    // The player side is played by a greedy AI.
    let player_behavior = AiTier::Greedy.behavior();
    while !runner.is_battle_ended() && runner.session().round <= MAX_ROUNDS {
        match runner.run_ai_round(player_behavior.as_ref()) {
            Ok(result) if !options.json => {
                for line in &result.log_lines {
                    println!("{}", line);
                }
            }
            Ok(_) => {}
            Err(e) => {
                println!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let report = runner.battle_report();
    if options.json {
        let output = serde_json::json!({
            "events": runner.all_events(),
            "report": report,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                println!("Error serializing events: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!();
    println!("=== Battle Over after {} rounds ===", report.rounds);
    for entry in &report.entries {
        println!(
            "{:<8} {:<12} dealt {:>4}  taken {:>4}  kills {}{}",
            entry.side.label(),
            entry.name,
            entry.damage_dealt,
            entry.damage_taken,
            entry.kills,
            if entry.fainted { "  (fainted)" } else { "" }
        );
    }
    if let Some(mvp) = &report.mvp {
        println!("MVP: {} ({} kills, {} damage)", mvp.name, mvp.kills, mvp.damage_dealt);
    }

    ExitCode::SUCCESS
}
