//! Monte Carlo validation against a sized bankroll.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use bankroll::simulation::monte_carlo::ValidatorConfig;
use bankroll::{
    minimum_bankroll, simulate_round, validate, BankrollSizer, MonteCarloValidator, RiskAssessor,
    Roll, RollPolicy,
};

fn sample_roll() -> Roll {
    let mut roll = Roll::new(100, RollPolicy::default()).unwrap();
    roll.announce_bet(50.0, 1, 50, 1.9).unwrap();
    roll.announce_bet(20.0, 41, 65, 3.8).unwrap();
    roll.announce_bet(40.0, 70, 80, 8.5).unwrap();
    roll.announce_bet(100.0, 10, 90, 1.2).unwrap();
    roll
}

#[test]
fn test_breach_probability_in_unit_interval() {
    let roll = sample_roll();
    let ledger = roll.ledger().unwrap();
    let start = minimum_bankroll(&ledger, roll.premium_collected(), 100);
    assert!(start > 0.0);

    for seed in 0..5 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let p = validate(roll.bets(), 100, start, 100, 500, start * 0.5, &mut rng);
        assert!((0.0..=1.0).contains(&p), "seed {seed}: {p}");
    }
}

#[test]
fn test_breach_probability_converges() {
    let roll = sample_roll();
    let ledger = roll.ledger().unwrap();
    let start = minimum_bankroll(&ledger, roll.premium_collected(), 100);

    let a = validate(roll.bets(), 100, start, 100, 10_000, start * 0.5, &mut ChaCha20Rng::seed_from_u64(1));
    let b = validate(roll.bets(), 100, start, 100, 10_000, start * 0.5, &mut ChaCha20Rng::seed_from_u64(2));
    assert!((a - b).abs() < 0.04, "independent estimates diverge: {a} vs {b}");
}

#[test]
fn test_bigger_bankroll_breaches_less() {
    let roll = sample_roll();
    let ledger = roll.ledger().unwrap();
    let start = minimum_bankroll(&ledger, roll.premium_collected(), 100);

    // Same absolute watch limit, ten times the reserve.
    let watch = start * 0.5;
    let small = validate(roll.bets(), 100, start, 100, 4_000, watch, &mut ChaCha20Rng::seed_from_u64(8));
    let large = validate(roll.bets(), 100, start * 10.0, 100, 4_000, watch, &mut ChaCha20Rng::seed_from_u64(8));
    assert!(large <= small, "large {large} > small {small}");
}

#[test]
fn test_round_is_reproducible() {
    let roll = sample_roll();
    let a = simulate_round(roll.bets(), 100, 900.0, 1000.0, &mut ChaCha20Rng::seed_from_u64(4));
    let b = simulate_round(roll.bets(), 100, 900.0, 1000.0, &mut ChaCha20Rng::seed_from_u64(4));
    assert_eq!(a, b);
}

#[test]
fn test_full_assessment() {
    let assessor = RiskAssessor::new(
        BankrollSizer::default(),
        MonteCarloValidator::new(ValidatorConfig {
            roll_amount: 100,
            sim_amount: 2_000,
            watch_fraction: 0.5,
        }),
    );
    let roll = sample_roll();
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let report = assessor.assess(&roll, &mut rng).unwrap();

    assert_eq!(report.bet_count, 4);
    assert!(report.min_bankroll > 0.0);
    assert!(!report.losing_segments.is_empty());
    let validation = report.validation.as_ref().unwrap();
    assert_eq!(validation.sim_amount, 2_000);
    // A sized bankroll should survive the large majority of runs.
    assert!(report.breach_probability() < 0.5, "breach {}", report.breach_probability());
}
