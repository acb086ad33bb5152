//! Binary insertion of a newly liked item into a partial ranking.
//!
//! The engine proposes one comparison at a time and the caller feeds the
//! decisive outcome back, halving the candidate interval on each step. A
//! ranking of length `n` therefore costs at most `ceil(log2(n + 1))`
//! comparisons.
//!
//! The engine operates on item ids only; rating updates for each decisive
//! comparison are applied by the caller.

use serde::{Deserialize, Serialize};

use crate::error::{RankdeckError, Result};

/// Next action in an insertion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertionStep {
    /// Ask the user to compare these two items. `item_a` is always the
    /// candidate being inserted, `item_b` the ranked rival.
    Compare { item_a: String, item_b: String },
    /// The run is finished: splice the candidate in at this index.
    Insert(usize),
}

/// State of one in-flight insertion: candidate id plus the open interval
/// `[lo, hi)` of still-possible positions in the ranking.
///
/// Serializable so an unfinished run can ride inside the session record
/// between requests. The ranking a run was started against must not change
/// until the run signals `Insert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryInsertion {
    item_id: String,
    lo: usize,
    hi: usize,
}

impl BinaryInsertion {
    /// Starts an insertion run for `item_id` against `ranking`.
    ///
    /// Returns the run together with its first step. An empty ranking
    /// resolves immediately to `Insert(0)` with zero comparisons.
    pub fn start(item_id: impl Into<String>, ranking: &[String]) -> (Self, InsertionStep) {
        let run = Self {
            item_id: item_id.into(),
            lo: 0,
            hi: ranking.len(),
        };
        let step = run.step(ranking);
        (run, step)
    }

    /// The candidate item this run is placing.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The pending step: either the next comparison or the final index.
    pub fn step(&self, ranking: &[String]) -> InsertionStep {
        if self.lo == self.hi {
            InsertionStep::Insert(self.lo)
        } else {
            let mid = (self.lo + self.hi) / 2;
            InsertionStep::Compare {
                item_a: self.item_id.clone(),
                item_b: ranking[mid].clone(),
            }
        }
    }

    /// Records a decisive outcome for the pending comparison.
    ///
    /// The `(winner, loser)` pair must match the pending comparison exactly
    /// (in either order); anything else fails with `InvalidVote`. Returns the
    /// next step after narrowing the interval.
    pub fn record_outcome(
        &mut self,
        ranking: &[String],
        winner: &str,
        loser: &str,
    ) -> Result<InsertionStep> {
        let (candidate, rival) = match self.step(ranking) {
            InsertionStep::Compare { item_a, item_b } => (item_a, item_b),
            InsertionStep::Insert(_) => {
                return Err(RankdeckError::invalid_vote(format!(
                    "no comparison pending for item '{}'",
                    self.item_id
                )));
            }
        };

        let matches_pair = (winner == candidate && loser == rival)
            || (winner == rival && loser == candidate);
        if !matches_pair {
            return Err(RankdeckError::invalid_vote(format!(
                "expected comparison between '{}' and '{}', got winner '{}' loser '{}'",
                candidate, rival, winner, loser
            )));
        }

        let mid = (self.lo + self.hi) / 2;
        if winner == candidate {
            // Candidate beats the rival: it belongs above the midpoint.
            self.hi = mid;
        } else {
            self.lo = mid + 1;
        }

        Ok(self.step(ranking))
    }

    /// Upper bound on comparisons needed to place an item into a ranking of
    /// length `n`.
    pub fn max_comparisons(n: usize) -> u32 {
        ((n + 1) as f64).log2().ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_ranking_inserts_directly() {
        let (_, step) = BinaryInsertion::start("new", &[]);
        assert_eq!(step, InsertionStep::Insert(0));
    }

    #[test]
    fn test_single_element_takes_one_comparison() {
        let ranking = ranking(&["a"]);
        let (mut run, step) = BinaryInsertion::start("new", &ranking);
        assert_eq!(
            step,
            InsertionStep::Compare {
                item_a: "new".to_string(),
                item_b: "a".to_string()
            }
        );

        // Candidate loses -> goes below the single ranked item.
        let next = run.record_outcome(&ranking, "a", "new").unwrap();
        assert_eq!(next, InsertionStep::Insert(1));
    }

    #[test]
    fn test_candidate_wins_moves_up() {
        let ranking = ranking(&["a", "b"]);
        let (mut run, step) = BinaryInsertion::start("c", &ranking);
        // interval [0, 2), mid 1 -> compare with "b" first
        assert_eq!(
            step,
            InsertionStep::Compare {
                item_a: "c".to_string(),
                item_b: "b".to_string()
            }
        );

        let next = run.record_outcome(&ranking, "c", "b").unwrap();
        // Winner narrows to [0, 1): one more comparison against "a".
        assert_eq!(
            next,
            InsertionStep::Compare {
                item_a: "c".to_string(),
                item_b: "a".to_string()
            }
        );
        let last = run.record_outcome(&ranking, "c", "a").unwrap();
        assert_eq!(last, InsertionStep::Insert(0));
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let ranking = ranking(&["a", "b", "c"]);
        let (mut run, _) = BinaryInsertion::start("d", &ranking);
        let err = run.record_outcome(&ranking, "a", "c").unwrap_err();
        assert!(err.is_invalid_vote());
    }

    #[test]
    fn test_winner_outside_pair_rejected() {
        let ranking = ranking(&["a"]);
        let (mut run, _) = BinaryInsertion::start("b", &ranking);
        let err = run.record_outcome(&ranking, "z", "a").unwrap_err();
        assert!(err.is_invalid_vote());
    }

    #[test]
    fn test_outcome_after_completion_rejected() {
        let (mut run, step) = BinaryInsertion::start("new", &[]);
        assert_eq!(step, InsertionStep::Insert(0));
        assert!(run.record_outcome(&[], "new", "x").unwrap_err().is_invalid_vote());
    }

    #[test]
    fn test_comparison_count_is_logarithmic() {
        // Drive full runs against rankings of growing size, always letting
        // the ranked item win (worst case for a low insert). The number of
        // comparisons must never exceed ceil(log2(n + 1)).
        for n in 0..64usize {
            let ranking: Vec<String> = (0..n).map(|i| format!("it-{}", i)).collect();
            let (mut run, mut step) = BinaryInsertion::start("cand", &ranking);
            let mut comparisons = 0u32;
            while let InsertionStep::Compare { item_b, .. } = step {
                comparisons += 1;
                step = run.record_outcome(&ranking, &item_b, "cand").unwrap();
            }
            assert!(
                comparisons <= BinaryInsertion::max_comparisons(n),
                "{} comparisons for ranking of {} (bound {})",
                comparisons,
                n,
                BinaryInsertion::max_comparisons(n)
            );
            // Always losing lands the candidate at the bottom.
            assert_eq!(step, InsertionStep::Insert(n));
        }
    }

    #[test]
    fn test_every_position_reachable() {
        // For a ranking of 4, steer the run to each target index and check
        // the final insert lands there.
        let ranking: Vec<String> = ranking(&["a", "b", "c", "d"]);
        for target in 0..=ranking.len() {
            let (mut run, mut step) = BinaryInsertion::start("x", &ranking);
            while let InsertionStep::Compare { item_a, item_b } = step {
                // The candidate should rank above `item_b` exactly when the
                // target index is at or above that rival's position.
                let rival_pos = ranking.iter().position(|r| *r == item_b).unwrap();
                let (winner, loser) = if target <= rival_pos {
                    (item_a.clone(), item_b.clone())
                } else {
                    (item_b.clone(), item_a.clone())
                };
                step = run.record_outcome(&ranking, &winner, &loser).unwrap();
            }
            assert_eq!(step, InsertionStep::Insert(target));
        }
    }
}
