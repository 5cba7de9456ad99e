//! Configuration parsed from TOML.
//!
//! The binary embeds `config.toml` at compile time and parses it from a
//! string, so no file is read at runtime. Every section has defaults; a
//! config may list nothing but its bets.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::pool::BankrollPool;
use crate::roll::{Roll, RollPolicy, DEFAULT_MAX_EXPECTED_VALUE};
use crate::simulation::monte_carlo::ValidatorConfig;
use crate::sizing::bankroll::{SizerConfig, DEFAULT_SCALE};
use crate::types::FIXED_FEE;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub roll: RollConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub bets: Vec<BetConfig>,
    #[serde(default)]
    pub investors: Vec<InvestorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RollConfig {
    pub max_result: u32,
    /// Expected-value cap; omit or set `enforce_ev_cap = false` to disable.
    pub max_expected_value: f64,
    pub enforce_ev_cap: bool,
    pub fee: f64,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            max_result: 100,
            max_expected_value: DEFAULT_MAX_EXPECTED_VALUE,
            enforce_ev_cap: true,
            fee: FIXED_FEE,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SizingConfig {
    pub scale: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub roll_amount: u32,
    pub sim_amount: u32,
    pub watch_fraction: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let validator = ValidatorConfig::default();
        Self {
            roll_amount: validator.roll_amount,
            sim_amount: validator.sim_amount,
            watch_fraction: validator.watch_fraction,
            seed: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BetConfig {
    pub amount: f64,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub multiplier: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvestorConfig {
    pub name: String,
    pub deposit: f64,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(contents).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Resolve an optional environment override.
    pub fn resolve_env(env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    pub fn roll_policy(&self) -> RollPolicy {
        RollPolicy {
            max_expected_value: self
                .roll
                .enforce_ev_cap
                .then_some(self.roll.max_expected_value),
            fee: self.roll.fee,
        }
    }

    pub fn sizer_config(&self) -> SizerConfig {
        SizerConfig { scale: self.sizing.scale }
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            roll_amount: self.simulation.roll_amount,
            sim_amount: self.simulation.sim_amount,
            watch_fraction: self.simulation.watch_fraction,
        }
    }

    /// Announce every configured bet on a fresh roll.
    pub fn build_roll(&self) -> Result<Roll> {
        let mut roll = Roll::new(self.roll.max_result, self.roll_policy())
            .context("Invalid roll configuration")?;
        for (i, bet) in self.bets.iter().enumerate() {
            roll.announce_bet(bet.amount, bet.lower_bound, bet.upper_bound, bet.multiplier)
                .with_context(|| format!("Invalid bet #{} in configuration", i + 1))?;
        }
        Ok(roll)
    }

    /// Fund a pool from the configured investor deposits.
    pub fn build_pool(&self) -> Result<BankrollPool> {
        let mut pool = BankrollPool::new();
        for investor in &self.investors {
            pool.deposit(&investor.name, investor.deposit)
                .with_context(|| format!("Invalid deposit for investor {}", investor.name))?;
        }
        Ok(pool)
    }
}
