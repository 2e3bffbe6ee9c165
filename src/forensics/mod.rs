//! Forensic analyzers
//!
//! One independent checker per actionable entity kind: URL reputation,
//! phone-number tracing, and payment-handle reputation. Every analyzer
//! returns exactly one finding per entity and recovers internal faults
//! locally. Malformed input becomes an INVALID finding, a failed probe
//! becomes a static-only score; nothing here aborts the pipeline.

pub mod payment;
pub mod phone;
pub mod url;

use crate::config::Config;
use crate::models::{EntityKind, ExtractedEntity, ForensicFinding, RiskTier};

pub use url::UrlAnalyzer;

/// Shared score→tier partition. Total and monotonic: every score in [0,1]
/// maps to exactly one tier and a higher score never lowers the tier.
pub fn tier_for_score(score: f32) -> RiskTier {
    if score < 0.4 {
        RiskTier::Low
    } else if score < 0.7 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Dispatches an entity to the analyzer for its kind.
///
/// Keywords carry no analyzer of their own; their signal flows through
/// the intent classifier instead.
pub struct ForensicEngine {
    url_analyzer: UrlAnalyzer,
}

impl ForensicEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            url_analyzer: UrlAnalyzer::new(config),
        }
    }

    pub async fn analyze(&self, entity: &ExtractedEntity) -> Option<ForensicFinding> {
        match entity.kind {
            EntityKind::Phone => Some(phone::trace_number(entity)),
            EntityKind::PaymentHandle => Some(payment::check_handle(entity)),
            EntityKind::Url => Some(self.url_analyzer.analyze(entity).await),
            EntityKind::Keyword => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_partition_total_and_monotonic() {
        let mut previous = RiskTier::Low;
        for i in 0..=100 {
            let score = i as f32 / 100.0;
            let tier = tier_for_score(score);
            assert!(
                rank(tier) >= rank(previous),
                "tier regressed at score {}",
                score
            );
            previous = tier;
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for_score(0.0), RiskTier::Low);
        assert_eq!(tier_for_score(0.39), RiskTier::Low);
        assert_eq!(tier_for_score(0.4), RiskTier::Medium);
        assert_eq!(tier_for_score(0.69), RiskTier::Medium);
        assert_eq!(tier_for_score(0.7), RiskTier::High);
        assert_eq!(tier_for_score(1.0), RiskTier::High);
    }

    fn rank(tier: RiskTier) -> u8 {
        match tier {
            RiskTier::Invalid => 0,
            RiskTier::Low => 1,
            RiskTier::Medium => 2,
            RiskTier::High => 3,
        }
    }
}
