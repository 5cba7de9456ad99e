//! BANKROLL: house risk ledger, bankroll sizing and Monte Carlo validation
//!
//! Entry point. Parses the embedded configuration, initialises structured
//! logging, announces the configured bets on a roll, sizes the bankroll
//! and validates it by simulation.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{info, warn};

use bankroll::config::AppConfig;
use bankroll::simulation::monte_carlo::MonteCarloValidator;
use bankroll::sizing::bankroll::BankrollSizer;
use bankroll::sizing::RiskAssessor;

const BANNER: &str = r#"
 ___   _   _  _ _  _____  ___  _    _
| _ ) /_\ | \| | |/ / _ \/ _ \| |  | |
| _ \/ _ \| .` | ' <|   / (_) | |__| |__
|___/_/ \_\_|\_|_|\_\_|_\\___/|____|____|

  Minimum bankroll sizing with Monte Carlo validation
  v0.1.0
"#;

const EMBEDDED_CONFIG: &str = include_str!("../config.toml");

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::from_toml_str(EMBEDDED_CONFIG)?;

    init_logging();

    println!("{BANNER}");

    let seed = match AppConfig::resolve_env("BANKROLL_SEED") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("BANKROLL_SEED is not a valid u64: {raw}"))?,
        None => cfg.simulation.seed,
    };

    info!(
        max_result = cfg.roll.max_result,
        bets = cfg.bets.len(),
        sims = cfg.simulation.sim_amount,
        rolls = cfg.simulation.roll_amount,
        seed,
        "BANKROLL starting up"
    );

    let roll = cfg.build_roll()?;
    if roll.bets().is_empty() {
        warn!("No bets configured, the bankroll will size to zero");
    }

    let assessor = RiskAssessor::new(
        BankrollSizer::new(cfg.sizer_config()),
        MonteCarloValidator::new(cfg.validator_config()),
    );
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let report = assessor.assess(&roll, &mut rng)?;

    for segment in &report.segments {
        info!(segment = %segment, "Ledger segment");
    }
    info!(
        min_bankroll = format!("{:.4}", report.min_bankroll),
        premium = format!("{:.2}", report.premium_collected),
        breach = format!("{:.2}%", report.breach_probability() * 100.0),
        "Assessment complete"
    );

    let pool = cfg.build_pool()?;
    if pool.can_cover(report.min_bankroll) {
        info!(
            pool = format!("{:.2}", pool.bankroll()),
            investors = cfg.investors.len(),
            "Pool covers the minimum bankroll"
        );
    } else {
        warn!(
            pool = format!("{:.2}", pool.bankroll()),
            required = format!("{:.2}", report.min_bankroll),
            "Pool is short of the minimum bankroll"
        );
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
    println!("{json}");

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bankroll=info"));

    let json_logging = std::env::var("BANKROLL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
