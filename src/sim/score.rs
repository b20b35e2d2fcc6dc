//! Basket counter

use serde::{Deserialize, Serialize};

/// Points scored this round
pub type Score = u64;

/// Owns the round score. Only the scoring trigger increments it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTracker {
    value: Score,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Score {
        self.value
    }

    /// Add one basket and return the new total
    pub fn increment(&mut self) -> Score {
        self.value += 1;
        self.value
    }

    /// Back to zero for a new round
    pub fn reset(&mut self) -> Score {
        self.value = 0;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_counts_up() {
        let mut score = ScoreTracker::new();
        for n in 1..=25 {
            assert_eq!(score.increment(), n);
        }
        assert_eq!(score.value(), 25);
    }

    #[test]
    fn test_reset_returns_zero() {
        let mut score = ScoreTracker::new();
        assert_eq!(score.reset(), 0);

        score.increment();
        score.increment();
        assert_eq!(score.reset(), 0);
        assert_eq!(score.value(), 0);
        assert_eq!(score.increment(), 1);
    }
}
