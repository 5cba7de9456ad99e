//! Minimum bankroll sizing.
//!
//! Turns a finished ledger into the reserve the house must hold. Rather
//! than summing worst cases (outcomes are mutually exclusive, so that
//! would wildly oversize), every losing segment contributes a cubed risk
//! term and the total is brought back with a cube root. The constants are
//! calibrated against simulation, not derived.

use serde::Serialize;
use tracing::{debug, warn};

use super::ledger::{RangeLedger, Segment};

/// Calibration scale applied to the cube-root risk total.
pub const DEFAULT_SCALE: f64 = 125.0;

/// Scale used when settling in integer base units.
pub const UNITS_SCALE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Bankroll sizing configuration.
#[derive(Debug, Clone)]
pub struct SizerConfig {
    /// Multiplier on the cube-root risk total.
    pub scale: f64,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE }
    }
}

// ---------------------------------------------------------------------------
// Per-segment risk
// ---------------------------------------------------------------------------

/// Risk contributed by a single losing segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRisk {
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub odds: f64,
    /// Ceiling on the share of bankroll this segment alone may represent.
    pub max_bet_factor: f64,
    /// Net outflow if the segment wins, plus the odds-weighted correction.
    pub effective_payout: f64,
    /// Cubed term added to the running total.
    pub contribution: f64,
}

/// Risk term for `segment`, or `None` if the house is net positive on it.
pub fn segment_risk(segment: &Segment, premium_collected: f64, max_result: u32) -> Option<SegmentRisk> {
    if segment.payout_if_won <= premium_collected {
        return None;
    }

    let odds = segment.odds(max_result);
    let max_bet_factor = 5.0 / (1.0 / odds - 1.0).sqrt() - 0.2;
    let effective_payout =
        segment.payout_if_won - premium_collected + segment.payout_if_won * odds;

    // Past odds of 1/626 the factor turns non-positive and the cubed term
    // would flip sign. Such segments add no risk rather than subtracting it.
    let contribution = if max_bet_factor > 0.0 {
        (effective_payout * odds / max_bet_factor).powi(3)
    } else {
        warn!(
            lower = segment.lower_bound,
            upper = segment.upper_bound,
            odds,
            max_bet_factor,
            "Segment too rare for the sizing curve, contribution clamped to zero"
        );
        0.0
    };

    Some(SegmentRisk {
        lower_bound: segment.lower_bound,
        upper_bound: segment.upper_bound,
        odds,
        max_bet_factor,
        effective_payout,
        contribution,
    })
}

/// Minimum bankroll at the default calibration scale.
pub fn minimum_bankroll(ledger: &RangeLedger, premium_collected: f64, max_result: u32) -> f64 {
    BankrollSizer::default().size(ledger, premium_collected, max_result)
}

// ---------------------------------------------------------------------------
// Sizer
// ---------------------------------------------------------------------------

pub struct BankrollSizer {
    config: SizerConfig,
}

impl Default for BankrollSizer {
    fn default() -> Self {
        Self::new(SizerConfig::default())
    }
}

impl BankrollSizer {
    pub fn new(config: SizerConfig) -> Self {
        Self { config }
    }

    /// Sizer matching the integer settlement scale.
    pub fn for_units() -> Self {
        Self::new(SizerConfig { scale: UNITS_SCALE })
    }

    pub fn config(&self) -> &SizerConfig {
        &self.config
    }

    /// Risk breakdown for every losing segment of the ledger.
    pub fn breakdown(
        &self,
        ledger: &RangeLedger,
        premium_collected: f64,
        max_result: u32,
    ) -> Vec<SegmentRisk> {
        ledger
            .segments()
            .iter()
            .filter_map(|s| segment_risk(s, premium_collected, max_result))
            .collect()
    }

    /// Minimum bankroll required to accept the bets folded into `ledger`.
    ///
    /// `premium_collected` is the sum of `amount - house_portion` over all
    /// bets. Segments paying out no more than that are skipped.
    pub fn size(&self, ledger: &RangeLedger, premium_collected: f64, max_result: u32) -> f64 {
        let risks = self.breakdown(ledger, premium_collected, max_result);
        let variance: f64 = risks.iter().map(|r| r.contribution).sum();
        let bankroll = (variance.cbrt() * self.config.scale).max(0.0);

        debug!(
            losing_segments = risks.len(),
            variance,
            bankroll = format!("{:.4}", bankroll),
            "Bankroll sized"
        );

        bankroll
    }

    /// Minimum bankroll truncated to integer base units.
    ///
    /// Payouts in the ledger must already be expressed in base units.
    pub fn size_units(&self, ledger: &RangeLedger, premium_collected: u64, max_result: u32) -> u64 {
        self.size(ledger, premium_collected as f64, max_result) as u64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
