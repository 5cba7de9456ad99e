//! Rolls: a round announced over `[1, max_result]` that bets are placed on.
//!
//! Bets are validated as they are announced, so a roll only ever holds
//! bets that fit its outcome space and respect the expected-value cap.

use serde::Serialize;
use tracing::{debug, warn};

use crate::sizing::ledger::{build_ledger, RangeLedger};
use crate::types::{premium_collected, BankrollError, Bet, Result, FIXED_FEE};

/// Default cap on a bet's expected value.
pub const DEFAULT_MAX_EXPECTED_VALUE: f64 = 0.99;

/// Rules every announced bet must follow.
#[derive(Debug, Clone)]
pub struct RollPolicy {
    /// Reject bets whose expected value exceeds this. `None` disables the cap.
    pub max_expected_value: Option<f64>,
    /// Fee fraction skimmed off every bet.
    pub fee: f64,
}

impl Default for RollPolicy {
    fn default() -> Self {
        Self {
            max_expected_value: Some(DEFAULT_MAX_EXPECTED_VALUE),
            fee: FIXED_FEE,
        }
    }
}

/// A single round and the bets placed on it.
#[derive(Debug, Clone, Serialize)]
pub struct Roll {
    max_result: u32,
    #[serde(skip)]
    policy: RollPolicy,
    bets: Vec<Bet>,
}

impl Roll {
    pub fn new(max_result: u32, policy: RollPolicy) -> Result<Self> {
        if max_result == 0 {
            return Err(BankrollError::InvalidBetParameters(
                "max result must be at least 1".into(),
            ));
        }
        Ok(Self { max_result, policy, bets: Vec::new() })
    }

    /// Validate and record a bet. Returns the stored bet with its derived fields.
    pub fn announce_bet(
        &mut self,
        amount: f64,
        lower_bound: u32,
        upper_bound: u32,
        multiplier: f64,
    ) -> Result<&Bet> {
        if lower_bound < 1 || upper_bound > self.max_result {
            return Err(BankrollError::RangeOutOfBounds {
                lower: lower_bound,
                upper: upper_bound,
                max_result: self.max_result,
            });
        }

        let bet = Bet::with_fee(
            amount,
            lower_bound,
            upper_bound,
            multiplier,
            self.max_result,
            self.policy.fee,
        )?;

        if let Some(max) = self.policy.max_expected_value {
            if bet.expected_value > max {
                return Err(BankrollError::ExpectedValueTooHigh { ev: bet.expected_value, max });
            }
        } else if bet.expected_value >= 1.0 {
            warn!(bet = %bet, "Bet has non-negative edge for the bettor");
        }

        debug!(bet = %bet, bets = self.bets.len() + 1, "Bet announced");
        self.bets.push(bet);
        Ok(&self.bets[self.bets.len() - 1])
    }

    pub fn max_result(&self) -> u32 {
        self.max_result
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    /// Total stake collected.
    pub fn total_amount(&self) -> f64 {
        self.bets.iter().map(|b| b.amount).sum()
    }

    /// Stake that may have to be paid back (net of the house portion).
    pub fn premium_collected(&self) -> f64 {
        premium_collected(&self.bets)
    }

    /// Fold every bet into a fresh ledger.
    pub fn ledger(&self) -> Result<RangeLedger> {
        build_ledger(&self.bets, self.max_result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
