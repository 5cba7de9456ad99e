//! Investor bankroll pool.
//!
//! Investors fund the bankroll in exchange for weight. The first deposit
//! into an empty pool mints [`INITIAL_WEIGHT`]; later deposits mint weight
//! in proportion to the bankroll they add, so every unit of weight always
//! claims the same share of whatever the bankroll is currently worth.
//! Winning bets are not paid out of the pool directly: their payout moves
//! into a per-bettor outstanding ledger and is claimed separately.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::types::{BankrollError, Result};

/// Weight minted by the first deposit into an empty pool.
pub const INITIAL_WEIGHT: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct BankrollPool {
    bankroll: f64,
    total_weight: u64,
    investors: HashMap<String, u64>,
    outstanding: HashMap<String, f64>,
}

impl BankrollPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Weight held by `investor` (0 if unknown).
    pub fn weight_of(&self, investor: &str) -> u64 {
        self.investors.get(investor).copied().unwrap_or(0)
    }

    /// Current value of `investor`'s weight.
    pub fn share_value(&self, investor: &str) -> f64 {
        self.value_of(self.weight_of(investor))
    }

    /// Payouts owed to `bettor` and not yet claimed.
    pub fn outstanding_for(&self, bettor: &str) -> f64 {
        self.outstanding.get(bettor).copied().unwrap_or(0.0)
    }

    pub fn total_outstanding(&self) -> f64 {
        self.outstanding.values().sum()
    }

    /// Whether the pool holds at least `min_bankroll`.
    pub fn can_cover(&self, min_bankroll: f64) -> bool {
        self.bankroll >= min_bankroll
    }

    fn value_of(&self, weight: u64) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        self.bankroll * weight as f64 / self.total_weight as f64
    }

    // -- Investors ----------------------------------------------------------

    /// Add `amount` to the bankroll and mint weight for `investor`.
    ///
    /// Returns the weight minted.
    pub fn deposit(&mut self, investor: &str, amount: f64) -> Result<u64> {
        check_amount(amount)?;

        let minted = if self.bankroll <= 0.0 || self.total_weight == 0 {
            INITIAL_WEIGHT
        } else {
            (amount / self.bankroll * self.total_weight as f64) as u64
        };
        if minted == 0 {
            return Err(BankrollError::InvalidAmount(format!(
                "deposit of {amount} is too small to mint weight"
            )));
        }

        self.bankroll += amount;
        self.total_weight += minted;
        *self.investors.entry(investor.to_string()).or_insert(0) += minted;

        info!(
            investor,
            amount,
            minted,
            bankroll = format!("{:.4}", self.bankroll),
            "Bankroll deposit"
        );
        Ok(minted)
    }

    /// Burn `weight` from `investor` and pay out its share of the bankroll.
    ///
    /// Returns the amount paid.
    pub fn withdraw(&mut self, investor: &str, weight: u64) -> Result<f64> {
        if weight == 0 {
            return Err(BankrollError::InvalidAmount("cannot withdraw zero weight".into()));
        }
        let held = self
            .investors
            .get(investor)
            .copied()
            .ok_or_else(|| BankrollError::UnknownAccount(investor.to_string()))?;
        if weight > held {
            return Err(BankrollError::InsufficientWeight {
                account: investor.to_string(),
                requested: weight,
                held,
            });
        }

        let amount = self.value_of(weight);
        self.bankroll -= amount;
        self.total_weight -= weight;
        if weight == held {
            self.investors.remove(investor);
        } else {
            self.investors.insert(investor.to_string(), held - weight);
        }

        info!(
            investor,
            weight,
            amount = format!("{:.4}", amount),
            bankroll = format!("{:.4}", self.bankroll),
            "Bankroll withdrawal"
        );
        Ok(amount)
    }

    // -- Rolls --------------------------------------------------------------

    /// Apply a roll's net result to the bankroll. Every investor's share
    /// moves with it.
    pub fn apply_change(&mut self, change: f64) {
        self.bankroll += change;
        debug!(
            change = format!("{:.4}", change),
            bankroll = format!("{:.4}", self.bankroll),
            "Bankroll changed"
        );
    }

    /// Move a winning bet's payout from the bankroll to `bettor`'s
    /// outstanding balance.
    pub fn record_win(&mut self, bettor: &str, payout: f64) -> Result<()> {
        check_amount(payout)?;
        self.bankroll -= payout;
        *self.outstanding.entry(bettor.to_string()).or_insert(0.0) += payout;
        debug!(bettor, payout, "Payout recorded");
        Ok(())
    }

    /// Pay `amount` of `bettor`'s outstanding balance. Clears the entry once
    /// it is fully paid.
    pub fn payout_bet(&mut self, bettor: &str, amount: f64) -> Result<()> {
        check_amount(amount)?;
        let outstanding = self
            .outstanding
            .get(bettor)
            .copied()
            .ok_or_else(|| BankrollError::UnknownAccount(bettor.to_string()))?;
        if amount > outstanding {
            return Err(BankrollError::InsufficientPayout {
                account: bettor.to_string(),
                requested: amount,
                outstanding,
            });
        }

        if amount == outstanding {
            self.outstanding.remove(bettor);
        } else {
            self.outstanding.insert(bettor.to_string(), outstanding - amount);
        }
        info!(bettor, amount, "Bet paid out");
        Ok(())
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BankrollError::InvalidAmount(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
