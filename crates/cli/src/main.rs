use anyhow::Context;
use clap::Parser;
use farkle_autoplay::{play_turns, write_json, write_text, SessionResult, TurnResult};
use farkle_core::{Event, EventBus, ThreePairsRule};
use farkle_data::{load_config, validate_config, FarkleConfig};
use flexi_logger::Logger;
use std::path::PathBuf;
use std::str::FromStr;

/// Six face weights for one die, written `w1,w2,w3,w4,w5,w6`.
#[derive(Debug, Clone)]
struct FaceWeights(Vec<f64>);

impl FromStr for FaceWeights {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let weights = value
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|err| format!("bad weight '{part}': {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if weights.len() != 6 {
            return Err(format!("expected 6 weights, got {}", weights.len()));
        }
        Ok(Self(weights))
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "farkle",
    about = "Plays solo Farkle turns, choosing every move with Monte Carlo tree search"
)]
struct Args {
    /// JSON file with optional `game` and `search` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for dice and search
    #[arg(long)]
    seed: Option<u64>,

    /// Search iterations per decision
    #[arg(long, conflicts_with = "time_limit_ms")]
    iterations: Option<u32>,

    /// Wall-clock budget per decision, in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Face weights for the next die; repeat once per loaded die
    #[arg(long)]
    weights: Vec<FaceWeights>,

    /// Three-pairs rule: strict or four-kind-pair
    #[arg(long)]
    three_pairs: Option<ThreePairsRule>,

    /// UCB1 exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    /// Decision cap per turn
    #[arg(long)]
    max_steps: Option<u32>,

    /// Number of turns to play
    #[arg(long, default_value_t = 1)]
    turns: u32,

    /// Write the session trace as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the session trace as text
    #[arg(long)]
    text: Option<PathBuf>,

    /// Print each die's face probabilities before playing
    #[arg(long)]
    describe_dice: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let config = resolve_config(&args)?;
    if args.describe_dice {
        describe_dice(&config)?;
    }

    let session = run_session(&config, args.turns)?;
    println!();
    println!("scores: {:?}", session.scores());
    println!("mean score: {:.2}", session.mean_score);

    if let Some(path) = args.json.as_ref() {
        write_json(path, &session).with_context(|| format!("write {}", path.display()))?;
        log::info!("json trace written to {}", path.display());
    }
    if let Some(path) = args.text.as_ref() {
        write_text(path, &session).with_context(|| format!("write {}", path.display()))?;
        log::info!("text trace written to {}", path.display());
    }
    Ok(())
}

/// Config file first, then flags on top.
fn resolve_config(args: &Args) -> anyhow::Result<FarkleConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => load_config(path)?,
        None => FarkleConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.search.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        config.search.iteration_limit = Some(iterations);
        config.search.time_limit_ms = None;
    }
    if let Some(ms) = args.time_limit_ms {
        config.search.time_limit_ms = Some(ms);
        config.search.iteration_limit = None;
    }
    if !args.weights.is_empty() {
        config.game.weights = args.weights.iter().map(|w| w.0.clone()).collect();
    }
    if let Some(rule) = args.three_pairs {
        config.game.three_pairs = rule;
    }
    if let Some(c) = args.exploration {
        config.search.exploration_c = c;
    }
    if let Some(steps) = args.max_steps {
        config.search.max_steps = steps;
    }
    validate_config(&config).context("invalid settings")?;
    Ok(config)
}

fn describe_dice(config: &FarkleConfig) -> anyhow::Result<()> {
    let dice = config.game.build_dice()?;
    for die in dice.iter() {
        let faces = die
            .probability_map()
            .into_iter()
            .map(|(face, p)| format!("{face}={:.1}%", p * 100.0))
            .collect::<Vec<_>>();
        println!("{}: {}", die.id(), faces.join(" "));
    }
    Ok(())
}

fn run_session(config: &FarkleConfig, turns: u32) -> anyhow::Result<SessionResult> {
    let budget = config.search.budget()?;
    log::info!(
        "seed {} budget {} rule {}",
        config.search.seed,
        budget.describe(),
        config.game.three_pairs
    );

    let mut events = EventBus::default();
    let session = play_turns(
        turns,
        &config.game,
        &config.search,
        &mut events,
        |turn, result, events| {
            println!("turn {turn}");
            for event in events.drain() {
                println!("  {}", format_event(&event));
            }
            print_turn_summary(result);
        },
    )?;
    Ok(session)
}

fn print_turn_summary(result: &TurnResult) {
    println!(
        "  => {:?}: {} points, {} decisions, {} iterations, {} ms",
        result.status,
        result.score,
        result.summary.steps,
        result.summary.total_iterations,
        result.summary.wall_time_ms
    );
}

fn format_event(event: &Event) -> String {
    match event {
        Event::Rolled { faces, .. } => format!("rolled {}", faces_label(faces)),
        Event::MeldTaken {
            faces,
            points,
            bank,
        } => format!("took {} for {points} (turn total {bank})", faces_label(faces)),
        Event::HotDice { dice } => format!("hot dice! rolling all {dice} again"),
        Event::Banked { points, total } => format!("banked +{points}, turn score {total}"),
        Event::Farkled { faces, lost } => {
            format!("farkle on {}, lost {lost}", faces_label(faces))
        }
    }
}

fn faces_label(faces: &[u8]) -> String {
    let parts = faces.iter().map(|face| face.to_string()).collect::<Vec<_>>();
    format!("[{}]", parts.join(" "))
}
