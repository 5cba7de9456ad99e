//! Property checks for the range ledger and bankroll sizing.
//!
//! Bets are generated from a seeded generator so every run checks the
//! same cases.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use bankroll::types::premium_collected;
use bankroll::{build_ledger, minimum_bankroll, BankrollError, Bet, RangeLedger};

const MAX_RESULT: u32 = 100;

fn random_bets(rng: &mut ChaCha20Rng, count: usize, max_result: u32) -> Vec<Bet> {
    (0..count)
        .map(|_| {
            let a = rng.gen_range(1..=max_result);
            let b = rng.gen_range(1..=max_result);
            let (lower, upper) = (a.min(b), a.max(b));
            // Whole-number amounts keep payout sums exact.
            let amount = f64::from(rng.gen_range(1..=20u32));
            let odds = f64::from(upper - lower + 1) / f64::from(max_result);
            let multiplier = (0.9 / odds).max(0.5).floor().max(1.0);
            Bet::new(amount, lower, upper, multiplier, max_result).unwrap()
        })
        .collect()
}

fn expected_payout(bets: &[Bet], outcome: u32) -> f64 {
    bets.iter()
        .filter(|b| b.wins_on(outcome))
        .map(|b| b.payout)
        .sum()
}

fn cut_points(ledger: &RangeLedger) -> Vec<(u32, u32)> {
    ledger
        .segments()
        .iter()
        .map(|s| (s.lower_bound, s.upper_bound))
        .collect()
}

#[test]
fn test_coverage_invariant_holds_after_every_insert() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    for _ in 0..50 {
        let bets = random_bets(&mut rng, 12, MAX_RESULT);
        let mut ledger = RangeLedger::new(MAX_RESULT).unwrap();
        for (i, bet) in bets.iter().enumerate() {
            ledger.insert(bet).unwrap();
            assert!(ledger.is_contiguous(), "broken after bet {i}: {ledger}");
            // At most two new segments per insertion.
            assert!(ledger.len() <= 1 + 2 * (i + 1));
        }
        assert_eq!(ledger.segments()[0].lower_bound, 1);
        assert_eq!(ledger.segments().last().unwrap().upper_bound, MAX_RESULT);
    }
}

#[test]
fn test_per_outcome_payout_matches_brute_force() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..50 {
        let bets = random_bets(&mut rng, 10, MAX_RESULT);
        let ledger = build_ledger(&bets, MAX_RESULT).unwrap();
        for outcome in 1..=MAX_RESULT {
            let got = ledger.payout_at(outcome).unwrap();
            let want = expected_payout(&bets, outcome);
            assert!(
                (got - want).abs() < 1e-9,
                "outcome {outcome}: ledger {got}, brute force {want}"
            );
        }
    }
}

#[test]
fn test_insertion_order_does_not_matter() {
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    for _ in 0..20 {
        let bets = random_bets(&mut rng, 8, MAX_RESULT);
        let reference = build_ledger(&bets, MAX_RESULT).unwrap();

        for _ in 0..10 {
            let mut shuffled = bets.clone();
            shuffled.shuffle(&mut rng);
            let ledger = build_ledger(&shuffled, MAX_RESULT).unwrap();

            assert_eq!(cut_points(&ledger), cut_points(&reference));
            for (a, b) in ledger.segments().iter().zip(reference.segments()) {
                assert!((a.payout_if_won - b.payout_if_won).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_reference_example_with_out_of_space_bets() {
    let all = vec![
        Bet::new(50.0, 1, 50, 2.0, 100).unwrap(),
        Bet::new(20.0, 41, 65, 4.0, 100).unwrap(),
        Bet::new(40.0, 200, 300, 9.0, 100).unwrap(),
        Bet::new(100.0, 100, 900, 1.1, 100).unwrap(),
    ];

    // The full list reaches past the outcome space and is rejected whole.
    let err = build_ledger(&all, 100).unwrap_err();
    assert_eq!(
        err,
        BankrollError::RangeOutOfBounds { lower: 200, upper: 300, max_result: 100 }
    );

    let ledger = build_ledger(&all[..2], 100).unwrap();
    assert_eq!(ledger.payout_at(1), Some(100.0));
    assert_eq!(ledger.payout_at(40), Some(100.0));
    assert_eq!(ledger.payout_at(41), Some(180.0));
    assert_eq!(ledger.payout_at(50), Some(180.0));
    assert_eq!(ledger.payout_at(51), Some(80.0));
    assert_eq!(ledger.payout_at(65), Some(80.0));
    assert_eq!(ledger.payout_at(66), Some(0.0));
    assert_eq!(cut_points(&ledger), vec![(1, 40), (41, 50), (51, 65), (66, 100)]);
}

#[test]
fn test_empty_bet_list() {
    let ledger = build_ledger(&[], MAX_RESULT).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.segments()[0].payout_if_won, 0.0);
    assert_eq!(minimum_bankroll(&ledger, 0.0, MAX_RESULT), 0.0);
}

#[test]
fn test_full_width_bet_is_out_of_space() {
    let wide = Bet::new(1.0, 0, u32::MAX, 1.0, MAX_RESULT).unwrap();
    let err = build_ledger(&[wide], MAX_RESULT).unwrap_err();
    assert_eq!(
        err,
        BankrollError::RangeOutOfBounds { lower: 0, upper: u32::MAX, max_result: MAX_RESULT }
    );
}

/// Bump one bet's multiplier at fixed premium and check the bankroll never drops.
fn assert_bump_never_shrinks(rng: &mut ChaCha20Rng, bets: &[Bet], max_result: u32) {
    let premium = premium_collected(bets);
    let base = minimum_bankroll(&build_ledger(bets, max_result).unwrap(), premium, max_result);
    assert!(base >= 0.0, "negative bankroll {base}");

    let idx = rng.gen_range(0..bets.len());
    let mut bumped = bets.to_vec();
    let b = &bets[idx];
    bumped[idx] =
        Bet::new(b.amount, b.lower_bound, b.upper_bound, b.multiplier * 1.5, max_result).unwrap();

    let larger = minimum_bankroll(&build_ledger(&bumped, max_result).unwrap(), premium, max_result);
    assert!(
        larger >= base - 1e-9,
        "bumping bet {idx} shrank the bankroll: {base} -> {larger}"
    );
}

#[test]
fn test_larger_payout_never_shrinks_bankroll() {
    let mut rng = ChaCha20Rng::seed_from_u64(31337);
    for _ in 0..30 {
        let bets = random_bets(&mut rng, 6, MAX_RESULT);
        assert_bump_never_shrinks(&mut rng, &bets, MAX_RESULT);
    }
}

#[test]
fn test_larger_payout_never_shrinks_bankroll_with_rare_segments() {
    const WIDE_SPACE: u32 = 1000;
    let mut rng = ChaCha20Rng::seed_from_u64(4242);
    for _ in 0..30 {
        let mut bets = random_bets(&mut rng, 4, WIDE_SPACE);
        // Narrow bets land below 1/626 odds.
        for _ in 0..2 {
            let lower = rng.gen_range(1..=WIDE_SPACE - 1);
            let upper = lower + rng.gen_range(0..=1);
            let amount = f64::from(rng.gen_range(1..=5u32));
            bets.push(Bet::new(amount, lower, upper, 200.0, WIDE_SPACE).unwrap());
        }
        assert_bump_never_shrinks(&mut rng, &bets, WIDE_SPACE);
    }
}

#[test]
fn test_single_rare_bet_sizes_to_zero() {
    for multiplier in [100.0, 200.0] {
        let bet = Bet::new(1.0, 500, 500, multiplier, 1000).unwrap();
        let ledger = build_ledger(std::slice::from_ref(&bet), 1000).unwrap();
        let sized = minimum_bankroll(&ledger, bet.premium(), 1000);
        assert_eq!(sized, 0.0);
    }
}
