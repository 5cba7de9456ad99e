//! Range ledger.
//!
//! Partitions the outcome space `[1, max_result]` into disjoint segments,
//! each carrying the total payout owed if the round lands inside it.
//! Bets are folded in one at a time; a bet only ever splits the segments
//! at its own two edges, so the chain grows by at most two segments per
//! insertion and the final partition does not depend on insertion order.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::types::{BankrollError, Bet, Result};

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A maximal sub-range of outcomes with a uniform cumulative payout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub lower_bound: u32,
    pub upper_bound: u32,
    /// Sum of payouts of every bet whose range covers this segment.
    pub payout_if_won: f64,
}

impl Segment {
    fn new(lower_bound: u32, upper_bound: u32, payout_if_won: f64) -> Self {
        Self { lower_bound, upper_bound, payout_if_won }
    }

    pub fn width(&self) -> u32 {
        self.upper_bound - self.lower_bound + 1
    }

    /// Probability of this segment winning under a uniform draw.
    pub fn odds(&self, max_result: u32) -> f64 {
        f64::from(self.width()) / f64::from(max_result)
    }

    pub fn contains(&self, outcome: u32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&outcome)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {:.2} payout",
            self.lower_bound, self.upper_bound, self.payout_if_won
        )
    }
}

/// How a bet's range overlaps a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// Bet covers the whole segment.
    All,
    /// Bet covers the lower part only.
    Left,
    /// Bet covers the upper part only.
    Right,
    /// Bet lies strictly inside the segment.
    Middle,
}

impl Overlap {
    fn classify(segment: &Segment, bet: &Bet) -> Self {
        let covers_low = bet.lower_bound <= segment.lower_bound;
        let covers_high = bet.upper_bound >= segment.upper_bound;
        match (covers_low, covers_high) {
            (true, true) => Overlap::All,
            (true, false) => Overlap::Left,
            (false, true) => Overlap::Right,
            (false, false) => Overlap::Middle,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Ordered, contiguous partition of `[1, max_result]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeLedger {
    max_result: u32,
    segments: Vec<Segment>,
}

impl RangeLedger {
    /// Fresh ledger: one zero-payout segment spanning the outcome space.
    pub fn new(max_result: u32) -> Result<Self> {
        if max_result == 0 {
            return Err(BankrollError::InvalidBetParameters(
                "max result must be at least 1".into(),
            ));
        }
        Ok(Self {
            max_result,
            segments: vec![Segment::new(1, max_result, 0.0)],
        })
    }

    pub fn max_result(&self) -> u32 {
        self.max_result
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true: a ledger always holds at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Reject a bet that does not fit inside `[1, max_result]`.
    pub fn check_range(&self, bet: &Bet) -> Result<()> {
        if bet.lower_bound < 1 || bet.upper_bound > self.max_result {
            return Err(BankrollError::RangeOutOfBounds {
                lower: bet.lower_bound,
                upper: bet.upper_bound,
                max_result: self.max_result,
            });
        }
        Ok(())
    }

    /// Fold one bet into the partition.
    ///
    /// Walks forward from the first segment the bet touches, adding the
    /// bet's payout to every covered segment and splitting the (at most
    /// two) segments that straddle its edges.
    pub fn insert(&mut self, bet: &Bet) -> Result<()> {
        self.check_range(bet)?;

        // First segment whose upper bound reaches the bet.
        let mut idx = self
            .segments
            .partition_point(|s| s.upper_bound < bet.lower_bound);

        while idx < self.segments.len() && self.segments[idx].lower_bound <= bet.upper_bound {
            let segment = &mut self.segments[idx];
            let overlap = Overlap::classify(segment, bet);
            let original = segment.payout_if_won;

            if overlap != Overlap::All {
                debug!(
                    ?overlap,
                    segment_lower = segment.lower_bound,
                    segment_upper = segment.upper_bound,
                    bet_lower = bet.lower_bound,
                    bet_upper = bet.upper_bound,
                    "Splitting segment"
                );
            }

            match overlap {
                Overlap::All => {
                    segment.payout_if_won += bet.payout;
                    idx += 1;
                }
                Overlap::Left => {
                    let tail = Segment::new(bet.upper_bound + 1, segment.upper_bound, original);
                    segment.upper_bound = bet.upper_bound;
                    segment.payout_if_won += bet.payout;
                    self.segments.insert(idx + 1, tail);
                    break;
                }
                Overlap::Right => {
                    let tail = Segment::new(
                        bet.lower_bound,
                        segment.upper_bound,
                        original + bet.payout,
                    );
                    segment.upper_bound = bet.lower_bound - 1;
                    self.segments.insert(idx + 1, tail);
                    idx += 2;
                }
                Overlap::Middle => {
                    let middle =
                        Segment::new(bet.lower_bound, bet.upper_bound, original + bet.payout);
                    let tail = Segment::new(bet.upper_bound + 1, segment.upper_bound, original);
                    segment.upper_bound = bet.lower_bound - 1;
                    self.segments.splice(idx + 1..idx + 1, [middle, tail]);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Segment containing `outcome`, if it lies in the outcome space.
    pub fn segment_for(&self, outcome: u32) -> Option<&Segment> {
        if outcome < 1 || outcome > self.max_result {
            return None;
        }
        let idx = self.segments.partition_point(|s| s.upper_bound < outcome);
        self.segments.get(idx)
    }

    /// Payout owed if the round lands on `outcome`.
    pub fn payout_at(&self, outcome: u32) -> Option<f64> {
        self.segment_for(outcome).map(|s| s.payout_if_won)
    }

    /// Largest single-segment payout (the worst outcome for the house).
    pub fn max_payout(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.payout_if_won)
            .fold(0.0, f64::max)
    }

    /// Whether the segments are sorted, contiguous and cover `[1, max_result]`.
    pub fn is_contiguous(&self) -> bool {
        let Some(first) = self.segments.first() else {
            return false;
        };
        let Some(last) = self.segments.last() else {
            return false;
        };
        first.lower_bound == 1
            && last.upper_bound == self.max_result
            && self.segments.iter().all(|s| s.lower_bound <= s.upper_bound)
            && self
                .segments
                .windows(2)
                .all(|w| w[0].upper_bound + 1 == w[1].lower_bound)
    }
}

impl fmt::Display for RangeLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Build a ledger from a bet list.
///
/// Every bet is range-checked before any is applied, so a failure never
/// leaves a half-built ledger behind.
pub fn build_ledger(bets: &[Bet], max_result: u32) -> Result<RangeLedger> {
    let mut ledger = RangeLedger::new(max_result)?;
    for bet in bets {
        ledger.check_range(bet)?;
    }
    for bet in bets {
        ledger.insert(bet)?;
    }
    debug!(bets = bets.len(), segments = ledger.len(), "Ledger built");
    Ok(ledger)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
