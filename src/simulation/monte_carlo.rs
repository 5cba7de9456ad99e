//! Monte Carlo bankroll validation.
//!
//! Replays the same bet list round after round against a simulated
//! bankroll and counts how often the bankroll ends at or below a watch
//! limit. Bets keep their original size every round; instead each round's
//! net effect is scaled by `bankroll / start_bankroll`. That makes the
//! trajectory compound without resizing stakes and overstates breaches
//! compared with a house that really rescales its limits.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::types::Bet;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Monte Carlo validation configuration.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Rounds played per simulated run.
    pub roll_amount: u32,
    /// Number of independent runs.
    pub sim_amount: u32,
    /// Watch limit as a fraction of the starting bankroll.
    pub watch_fraction: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            roll_amount: 100,
            sim_amount: 10_000,
            watch_fraction: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation primitives
// ---------------------------------------------------------------------------

/// Net cash effect on the house of one bet for a given outcome, unscaled.
pub fn bet_effect(bet: &Bet, outcome: u32) -> f64 {
    let mut effect = bet.premium();
    if bet.wins_on(outcome) {
        effect -= bet.payout;
    }
    effect
}

/// Net house effect of every bet for a given outcome, unscaled.
pub fn round_effect(bets: &[Bet], outcome: u32) -> f64 {
    bets.iter().map(|b| bet_effect(b, outcome)).sum()
}

/// Play one round and return the new bankroll.
///
/// The outcome is drawn uniformly from `[1, max_result]`. A non-positive
/// `start_bankroll` leaves the bankroll untouched.
pub fn simulate_round<R: Rng>(
    bets: &[Bet],
    max_result: u32,
    bankroll: f64,
    start_bankroll: f64,
    rng: &mut R,
) -> f64 {
    let outcome = rng.gen_range(1..=max_result.max(1));
    let factor = if start_bankroll > 0.0 {
        bankroll / start_bankroll
    } else {
        0.0
    };
    bankroll + round_effect(bets, outcome) * factor
}

/// Play `roll_amount` rounds from `start_bankroll` and return the final bankroll.
pub fn simulate_run<R: Rng>(
    bets: &[Bet],
    max_result: u32,
    start_bankroll: f64,
    roll_amount: u32,
    rng: &mut R,
) -> f64 {
    (0..roll_amount).fold(start_bankroll, |bankroll, _| {
        simulate_round(bets, max_result, bankroll, start_bankroll, rng)
    })
}

/// Fraction of `sim_amount` runs ending at or below `watch_limit`.
///
/// Returns 0 when no runs are requested.
pub fn validate<R: Rng>(
    bets: &[Bet],
    max_result: u32,
    start_bankroll: f64,
    roll_amount: u32,
    sim_amount: u32,
    watch_limit: f64,
    rng: &mut R,
) -> f64 {
    if sim_amount == 0 {
        return 0.0;
    }
    let breaches = (0..sim_amount)
        .filter(|_| simulate_run(bets, max_result, start_bankroll, roll_amount, rng) <= watch_limit)
        .count();
    breaches as f64 / f64::from(sim_amount)
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Outcome of a validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub start_bankroll: f64,
    pub watch_limit: f64,
    pub roll_amount: u32,
    pub sim_amount: u32,
    pub breaches: u32,
    /// `breaches / sim_amount`
    pub breach_probability: f64,
    pub mean_final_bankroll: f64,
    pub worst_final_bankroll: f64,
}

pub struct MonteCarloValidator {
    config: ValidatorConfig,
}

impl Default for MonteCarloValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl MonteCarloValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Watch limit for a given starting bankroll.
    pub fn watch_limit(&self, start_bankroll: f64) -> f64 {
        start_bankroll * self.config.watch_fraction
    }

    /// Run every simulation and summarise the final bankrolls.
    pub fn run<R: Rng>(
        &self,
        bets: &[Bet],
        max_result: u32,
        start_bankroll: f64,
        rng: &mut R,
    ) -> ValidationReport {
        let watch_limit = self.watch_limit(start_bankroll);
        let mut breaches = 0u32;
        let mut total = 0.0_f64;
        let mut worst = f64::INFINITY;

        for _ in 0..self.config.sim_amount {
            let final_bankroll =
                simulate_run(bets, max_result, start_bankroll, self.config.roll_amount, rng);
            if final_bankroll <= watch_limit {
                breaches += 1;
            }
            total += final_bankroll;
            worst = worst.min(final_bankroll);
        }

        let sims = self.config.sim_amount;
        let (breach_probability, mean_final_bankroll, worst_final_bankroll) = if sims > 0 {
            (f64::from(breaches) / f64::from(sims), total / f64::from(sims), worst)
        } else {
            (0.0, start_bankroll, start_bankroll)
        };

        debug!(
            sims,
            breaches,
            mean = format!("{:.2}", mean_final_bankroll),
            worst = format!("{:.2}", worst_final_bankroll),
            "Simulation finished"
        );
        info!(
            start_bankroll = format!("{:.2}", start_bankroll),
            watch_limit = format!("{:.2}", watch_limit),
            breach = format!("{:.2}%", breach_probability * 100.0),
            "Bankroll validated"
        );

        ValidationReport {
            start_bankroll,
            watch_limit,
            roll_amount: self.config.roll_amount,
            sim_amount: sims,
            breaches,
            breach_probability,
            mean_final_bankroll,
            worst_final_bankroll,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
