//! Elo-style rating updates.
//!
//! Pure computation: one decisive pairwise outcome in, two updated ratings
//! out. No ties are accepted — the caller must supply a decisive result.

use crate::error::{RankdeckError, Result};

/// K-factor for rating updates.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating for an item with no prior history.
pub const DEFAULT_RATING: f64 = 1400.0;

/// Expected score for a player rated `rating_a` against `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// Applies one decisive outcome and returns `(new_winner, new_loser)`.
///
/// Both updated ratings are rounded to the nearest integer value. The only
/// failure mode is non-finite input.
pub fn update_ratings(winner_rating: f64, loser_rating: f64, k: f64) -> Result<(f64, f64)> {
    if !winner_rating.is_finite() || !loser_rating.is_finite() || !k.is_finite() {
        return Err(RankdeckError::validation(format!(
            "ratings and k-factor must be finite (winner: {}, loser: {}, k: {})",
            winner_rating, loser_rating, k
        )));
    }

    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = 1.0 - expected_winner;

    let new_winner = (winner_rating + k * (1.0 - expected_winner)).round();
    let new_loser = (loser_rating + k * (0.0 - expected_loser)).round();

    Ok((new_winner, new_loser))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ratings() {
        // Equal ratings -> 0.5 expected score each, winner gains half of K.
        let (w, l) = update_ratings(1400.0, 1400.0, DEFAULT_K_FACTOR).unwrap();
        assert_eq!(w, 1416.0);
        assert_eq!(l, 1384.0);
    }

    #[test]
    fn test_favorite_wins() {
        let (w, l) = update_ratings(1500.0, 1400.0, DEFAULT_K_FACTOR).unwrap();
        assert_eq!(w, 1512.0);
        assert_eq!(l, 1388.0);
    }

    #[test]
    fn test_upset_moves_ratings_more() {
        // An underdog win shifts ratings further than a favorite win.
        let (underdog, _) = update_ratings(1400.0, 1500.0, DEFAULT_K_FACTOR).unwrap();
        let (favorite, _) = update_ratings(1500.0, 1400.0, DEFAULT_K_FACTOR).unwrap();
        assert!(underdog - 1400.0 > favorite - 1500.0);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let e_a = expected_score(1450.0, 1380.0);
        let e_b = expected_score(1380.0, 1450.0);
        assert!((e_a + e_b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_finite_input() {
        assert!(update_ratings(f64::NAN, 1400.0, DEFAULT_K_FACTOR).is_err());
        assert!(update_ratings(1400.0, f64::INFINITY, DEFAULT_K_FACTOR).is_err());
        assert!(update_ratings(1400.0, 1400.0, f64::NAN).is_err());
    }
}
