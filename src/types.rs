//! Shared types for the bankroll engine.
//!
//! `Bet` is the value object every other module consumes. It is validated
//! on construction and never mutated afterwards, so the ledger, sizer and
//! simulator can all share one bet list by reference.

use serde::Serialize;
use std::fmt;

/// Fee skimmed off every bet regardless of outcome (0.7%).
pub const FIXED_FEE: f64 = 0.007;

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// A fixed-odds bet on the closed outcome range `[lower_bound, upper_bound]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bet {
    /// Stake collected from the bettor.
    pub amount: f64,
    pub lower_bound: u32,
    pub upper_bound: u32,
    /// Payout multiplier applied to `amount` on a win.
    pub multiplier: f64,
    /// `amount * multiplier`
    pub payout: f64,
    /// Probability of winning under a uniform draw over `[1, max_result]`.
    pub odds: f64,
    /// Expected return ratio for the bettor (`odds * multiplier`).
    pub expected_value: f64,
    /// Share of the stake kept by the house operators independent of outcome.
    pub house_portion: f64,
}

impl Bet {
    /// Build a bet with the default [`FIXED_FEE`].
    pub fn new(
        amount: f64,
        lower_bound: u32,
        upper_bound: u32,
        multiplier: f64,
        max_result: u32,
    ) -> Result<Self> {
        Self::with_fee(amount, lower_bound, upper_bound, multiplier, max_result, FIXED_FEE)
    }

    /// Build a bet with an explicit fee fraction.
    pub fn with_fee(
        amount: f64,
        lower_bound: u32,
        upper_bound: u32,
        multiplier: f64,
        max_result: u32,
        fee: f64,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BankrollError::InvalidBetParameters(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(BankrollError::InvalidBetParameters(format!(
                "multiplier must be positive, got {multiplier}"
            )));
        }
        if lower_bound > upper_bound {
            return Err(BankrollError::InvalidBetParameters(format!(
                "lower bound {lower_bound} exceeds upper bound {upper_bound}"
            )));
        }
        if max_result == 0 {
            return Err(BankrollError::InvalidBetParameters(
                "max result must be at least 1".into(),
            ));
        }
        if !fee.is_finite() || !(0.0..1.0).contains(&fee) {
            return Err(BankrollError::InvalidBetParameters(format!(
                "fee must be in [0, 1), got {fee}"
            )));
        }

        let width = u64::from(upper_bound) - u64::from(lower_bound) + 1;
        let odds = width as f64 / f64::from(max_result);
        let expected_value = odds * multiplier;

        Ok(Self {
            amount,
            lower_bound,
            upper_bound,
            multiplier,
            payout: amount * multiplier,
            odds,
            expected_value,
            house_portion: amount * (1.0 - expected_value - fee),
        })
    }

    /// Money collected by the bankroll that may have to be paid back.
    pub fn premium(&self) -> f64 {
        self.amount - self.house_portion
    }

    /// Whether `outcome` falls inside this bet's range.
    pub fn wins_on(&self, outcome: u32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&outcome)
    }

    /// Number of outcomes this bet covers.
    pub fn width(&self) -> u64 {
        u64::from(self.upper_bound) - u64::from(self.lower_bound) + 1
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} on {}-{} x{} (payout {:.2}, EV {:.3})",
            self.amount,
            self.lower_bound,
            self.upper_bound,
            self.multiplier,
            self.payout,
            self.expected_value,
        )
    }
}

/// Total premium collected across a bet list.
pub fn premium_collected(bets: &[Bet]) -> f64 {
    bets.iter().map(Bet::premium).sum()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building bets, rolls and ledgers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BankrollError {
    #[error("Bet range {lower}-{upper} lies outside the outcome space 1-{max_result}")]
    RangeOutOfBounds { lower: u32, upper: u32, max_result: u32 },

    #[error("Invalid bet parameters: {0}")]
    InvalidBetParameters(String),

    #[error("Expected value {ev:.4} exceeds the cap of {max:.4}")]
    ExpectedValueTooHigh { ev: f64, max: f64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Account {account} holds {held} weight, cannot withdraw {requested}")]
    InsufficientWeight { account: String, requested: u64, held: u64 },

    #[error("Account {account} is owed {outstanding:.8}, cannot pay out {requested:.8}")]
    InsufficientPayout { account: String, requested: f64, outstanding: f64 },
}

pub type Result<T> = std::result::Result<T, BankrollError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
