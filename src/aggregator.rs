//! Risk aggregator
//!
//! Folds the classifier output and the per-entity forensic findings into
//! a single verdict. The entity contribution is the MAXIMUM finding
//! score, not an average: one high-risk entity must not be diluted by
//! several harmless ones. A missing finding (abandoned probe, dropped
//! task) is simply absent from the max.

use crate::forensics::tier_for_score;
use crate::models::{ClassificationResult, ForensicFinding, RiskTier, RiskVerdict};
use std::cmp::Ordering;

/// Relative weight of the classifier signal vs. the strongest entity
const CLASSIFIER_WEIGHT: f32 = 0.45;
const ENTITY_WEIGHT: f32 = 0.55;

/// Combine classification and findings into one verdict.
///
/// The classifier contributes its confidence only for scam categories;
/// a SAFE classification contributes nothing regardless of confidence.
/// The result score is always in [0,1] and the tier is a total,
/// monotonic function of it.
pub fn aggregate(
    classification: &ClassificationResult,
    findings: Vec<ForensicFinding>,
) -> RiskVerdict {
    let classifier_signal = if classification.category.is_scam() {
        classification.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let max_entity_score = findings
        .iter()
        .map(|f| f.score)
        .fold(0.0_f32, f32::max);

    let score =
        (CLASSIFIER_WEIGHT * classifier_signal + ENTITY_WEIGHT * max_entity_score).clamp(0.0, 1.0);

    RiskVerdict {
        score,
        tier: tier_for_score(score),
        findings,
    }
}

//
// ================= RiskTier Ordering =================
//

impl PartialOrd for RiskTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl RiskTier {
    fn rank(&self) -> u8 {
        match self {
            RiskTier::Invalid => 0,
            RiskTier::Low => 1,
            RiskTier::Medium => 2,
            RiskTier::High => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, ExtractedEntity, IntentCategory};

    fn finding(score: f32) -> ForensicFinding {
        ForensicFinding {
            entity: ExtractedEntity {
                kind: EntityKind::Phone,
                value: "9876543210".to_string(),
                position: 0,
            },
            score,
            tier: tier_for_score(score),
            flag: "test".to_string(),
            details: vec![],
        }
    }

    fn classification(category: IntentCategory, confidence: f32) -> ClassificationResult {
        ClassificationResult { category, confidence }
    }

    #[test]
    fn test_max_not_average() {
        // Several low findings must not dilute one high finding
        let verdict = aggregate(
            &classification(IntentCategory::Safe, 0.9),
            vec![finding(0.1), finding(0.1), finding(0.9), finding(0.1)],
        );
        assert!((verdict.score - 0.55 * 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_safe_classification_contributes_nothing() {
        let verdict = aggregate(&classification(IntentCategory::Safe, 0.99), vec![]);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.tier, RiskTier::Low);
    }

    #[test]
    fn test_scam_classification_alone() {
        let verdict = aggregate(&classification(IntentCategory::Threat, 0.99), vec![]);
        assert!((verdict.score - 0.45 * 0.99).abs() < 1e-6);
        assert_eq!(verdict.tier, RiskTier::Medium);
    }

    #[test]
    fn test_missing_findings_tolerated() {
        // An abandoned probe just leaves its finding out of the list
        let with_all = aggregate(
            &classification(IntentCategory::Urgency, 0.8),
            vec![finding(0.3), finding(0.6)],
        );
        let with_partial = aggregate(
            &classification(IntentCategory::Urgency, 0.8),
            vec![finding(0.6)],
        );
        assert_eq!(with_all.score, with_partial.score);
    }

    #[test]
    fn test_score_always_in_range() {
        let categories = [
            IntentCategory::Urgency,
            IntentCategory::Greed,
            IntentCategory::Threat,
            IntentCategory::Safe,
        ];
        for category in categories {
            for confidence in [0.0, 0.5, 1.0] {
                for entity_score in [0.0, 0.5, 0.99] {
                    let verdict = aggregate(
                        &classification(category, confidence),
                        vec![finding(entity_score)],
                    );
                    assert!(verdict.score >= 0.0 && verdict.score <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_tier_monotonic_in_score() {
        let mut previous = RiskTier::Low;
        for i in 0..=20 {
            let entity_score = i as f32 / 20.0;
            let verdict = aggregate(
                &classification(IntentCategory::Urgency, 1.0),
                vec![finding(entity_score)],
            );
            assert!(verdict.tier >= previous);
            previous = verdict.tier;
        }
    }

    #[test]
    fn test_invalid_findings_contribute_zero() {
        let mut invalid = finding(0.0);
        invalid.tier = RiskTier::Invalid;
        let verdict = aggregate(&classification(IntentCategory::Safe, 0.2), vec![invalid]);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_findings_order_preserved() {
        let verdict = aggregate(
            &classification(IntentCategory::Greed, 0.9),
            vec![finding(0.2), finding(0.8), finding(0.5)],
        );
        let scores: Vec<f32> = verdict.findings.iter().map(|f| f.score).collect();
        assert_eq!(scores, vec![0.2, 0.8, 0.5]);
    }
}
