//! BANKROLL: house risk ledger, bankroll sizing and Monte Carlo validation
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod roll;
pub mod pool;
pub mod sizing;
pub mod simulation;

pub use pool::BankrollPool;
pub use roll::{Roll, RollPolicy};
pub use sizing::bankroll::{minimum_bankroll, BankrollSizer};
pub use sizing::ledger::{build_ledger, RangeLedger, Segment};
pub use sizing::{RiskAssessor, RiskReport};
pub use simulation::monte_carlo::{simulate_round, validate, MonteCarloValidator};
pub use types::{BankrollError, Bet};
