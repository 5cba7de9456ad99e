//! Simulation: Monte Carlo replay of rolls against a bankroll.

pub mod monte_carlo;
