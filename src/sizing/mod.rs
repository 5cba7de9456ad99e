//! Sizing engine: range ledger, bankroll sizing and simulated validation.

pub mod bankroll;
pub mod ledger;

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::roll::Roll;
use crate::simulation::monte_carlo::{MonteCarloValidator, ValidationReport};
use crate::types::Result;
use bankroll::{BankrollSizer, SegmentRisk};
use ledger::Segment;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything computed for one roll.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub max_result: u32,
    pub bet_count: usize,
    pub total_amount: f64,
    pub premium_collected: f64,
    pub segments: Vec<Segment>,
    pub losing_segments: Vec<SegmentRisk>,
    pub min_bankroll: f64,
    /// `None` when there was no risk to validate.
    pub validation: Option<ValidationReport>,
}

impl RiskReport {
    /// Simulated breach probability (0 if the roll carried no risk).
    pub fn breach_probability(&self) -> f64 {
        self.validation
            .as_ref()
            .map(|v| v.breach_probability)
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

/// Pipelines ledger build → bankroll sizing → Monte Carlo validation.
pub struct RiskAssessor {
    sizer: BankrollSizer,
    validator: MonteCarloValidator,
}

impl RiskAssessor {
    pub fn new(sizer: BankrollSizer, validator: MonteCarloValidator) -> Self {
        Self { sizer, validator }
    }

    /// Size the bankroll for `roll` and validate it by simulation.
    ///
    /// The simulation starts from the computed minimum bankroll with the
    /// validator's watch fraction applied to it. A roll with no losing
    /// segment sizes to zero and skips simulation.
    pub fn assess<R: Rng>(&self, roll: &Roll, rng: &mut R) -> Result<RiskReport> {
        let max_result = roll.max_result();
        let ledger = roll.ledger()?;
        let premium = roll.premium_collected();

        let losing_segments = self.sizer.breakdown(&ledger, premium, max_result);
        let min_bankroll = self.sizer.size(&ledger, premium, max_result);

        info!(
            bets = roll.bets().len(),
            segments = ledger.len(),
            losing = losing_segments.len(),
            premium = format!("{:.2}", premium),
            min_bankroll = format!("{:.2}", min_bankroll),
            "Roll sized"
        );

        let validation = if min_bankroll > 0.0 {
            Some(self.validator.run(roll.bets(), max_result, min_bankroll, rng))
        } else if losing_segments.is_empty() {
            info!("No losing segments, skipping simulation");
            None
        } else {
            warn!(
                losing = losing_segments.len(),
                "Losing segments are too rare to size, skipping simulation"
            );
            None
        };

        Ok(RiskReport {
            max_result,
            bet_count: roll.bets().len(),
            total_amount: roll.total_amount(),
            premium_collected: premium,
            segments: ledger.segments().to_vec(),
            losing_segments,
            min_bankroll,
            validation,
        })
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new(BankrollSizer::default(), MonteCarloValidator::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
