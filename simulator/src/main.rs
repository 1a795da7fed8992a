use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ringshot_simulator::simulate;
use ringshot_types::Difficulty;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rounds to simulate per difficulty.
    #[arg(short, long, default_value_t = 100_000)]
    rounds: u64,

    /// Darts thrown per round.
    #[arg(short, long, default_value_t = 1)]
    darts: u32,

    /// Bet per round.
    #[arg(short, long, default_value_t = 10.0)]
    bet: f64,

    /// RNG seed, for reproducible runs.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Limit to one difficulty (easy, medium, hard, expert); default all.
    #[arg(long)]
    difficulty: Option<String>,

    /// Emit the report as JSON instead of log lines.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let difficulties: Vec<Difficulty> = match &args.difficulty {
        Some(name) => vec![name
            .parse()
            .with_context(|| format!("invalid difficulty {name:?}"))?],
        None => Difficulty::ALL.to_vec(),
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut summaries = Vec::new();
    for difficulty in difficulties {
        let summary = simulate(&mut rng, difficulty, args.rounds, args.darts, args.bet);
        if !args.json {
            info!(
                difficulty = %summary.difficulty,
                rounds = summary.rounds,
                analytic_ev = summary.analytic_ev,
                local_rtp = summary.local_rtp,
                external_rtp = summary.external_rtp,
                tolerance = summary.tolerance,
                bullseyes = summary.bullseyes,
                biggest_multiplier = summary.biggest_multiplier,
                "simulated"
            );
        }
        summaries.push(summary);
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("failed to encode report")?
        );
    }

    // Fairness gate: either resolution path drifting from the analytic
    // expectation fails the run.
    let drifted: Vec<String> = summaries
        .iter()
        .filter(|s| !s.within_tolerance())
        .map(|s| s.difficulty.to_string())
        .collect();
    if !drifted.is_empty() {
        anyhow::bail!("RTP drifted beyond tolerance for: {}", drifted.join(", "));
    }

    Ok(())
}
