//! Strategies for deciding when two hashes are near-duplicates.

use super::MatchType;
use crate::core::hasher::HASH_BITS;
use crate::error::CompareError;

/// Decides whether a Hamming distance makes two images near-duplicates
pub trait ComparisonStrategy: Send + Sync {
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Classify the match type based on distance
    fn classify(&self, distance: u32) -> MatchType;

    /// Get the threshold used
    fn threshold(&self) -> u32;
}

/// Simple threshold-based comparison strategy
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Maximum distance to consider as duplicate
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// Recommended thresholds for 64-bit dHashes:
    /// - 5: Conservative, few false positives
    /// - 8: Balanced (default)
    /// - 10: Permissive, catches more near-duplicates
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Create a strategy, rejecting thresholds a 64-bit hash can never reach
    pub fn checked(threshold: u32) -> Result<Self, CompareError> {
        if threshold > HASH_BITS {
            return Err(CompareError::InvalidThreshold { value: threshold });
        }
        Ok(Self::new(threshold))
    }

    /// Create a conservative strategy (threshold = 5)
    pub fn conservative() -> Self {
        Self::new(5)
    }

    /// Create a balanced strategy (threshold = 8)
    pub fn balanced() -> Self {
        Self::new(8)
    }

    /// Create a permissive strategy (threshold = 10)
    pub fn permissive() -> Self {
        Self::new(10)
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn classify(&self, distance: u32) -> MatchType {
        MatchType::from_distance(distance)
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_strategy_at_boundary() {
        let strategy = ThresholdStrategy::new(5);

        assert!(strategy.is_duplicate(4));
        assert!(strategy.is_duplicate(5));
        assert!(!strategy.is_duplicate(6));
    }

    #[test]
    fn threshold_strategy_classifies_correctly() {
        let strategy = ThresholdStrategy::new(10);

        assert_eq!(strategy.classify(0), MatchType::Exact);
        assert_eq!(strategy.classify(3), MatchType::NearExact);
        assert_eq!(strategy.classify(7), MatchType::Similar);
        assert_eq!(strategy.classify(12), MatchType::MaybeSimilar);
    }

    #[test]
    fn preset_strategies() {
        assert_eq!(ThresholdStrategy::conservative().threshold(), 5);
        assert_eq!(ThresholdStrategy::balanced().threshold(), 8);
        assert_eq!(ThresholdStrategy::permissive().threshold(), 10);
    }

    #[test]
    fn checked_rejects_unreachable_threshold() {
        assert!(ThresholdStrategy::checked(64).is_ok());
        assert!(matches!(
            ThresholdStrategy::checked(65),
            Err(CompareError::InvalidThreshold { value: 65 })
        ));
    }
}
